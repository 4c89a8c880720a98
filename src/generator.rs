use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::{Platform, UserRequest};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {status} {detail}")]
    Api { status: u16, detail: String },

    #[error("Gemini response parse failed: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart {
    pub text: String,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// Every level of the response is optional; Gemini omits `content` for
/// blocked candidates and `text` for non-text parts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Concatenated, trimmed text of the first candidate, if it has any parts.
pub fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.as_ref()?.first()?;
    let parts = candidate.content.as_ref()?.parts.as_ref()?;
    if parts.is_empty() {
        return None;
    }
    let text: String = parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    Some(text.trim().to_string())
}

/// The single seam to the hosted model, so the pipeline can run against an
/// in-memory model.
#[async_trait]
pub trait CopyModel: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse, GeneratorError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            endpoint: settings.endpoint(),
            model: settings.generator.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CopyModel for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse, GeneratorError> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                detail: error_body.trim().to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| GeneratorError::Decode(err.to_string()))
    }
}

#[derive(Clone)]
pub struct CopyGenerator {
    model: Arc<dyn CopyModel>,
}

impl CopyGenerator {
    pub fn new(model: Arc<dyn CopyModel>) -> Self {
        Self { model }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let client = GeminiClient::new(settings);
        info!("Gemini client initialized (model: {})", client.model());
        Self::new(Arc::new(client))
    }

    /// Returns the generated copy block, or an empty string when the call
    /// fails or the response carries no usable candidate.
    pub async fn generate(&self, request: &UserRequest) -> String {
        let prompt = build_prompt(&request.product, &request.audience, request.platform);
        debug!(prompt_chars = prompt.len(), "calling model");

        let started = Instant::now();
        let text = match self.model.generate_content(&prompt).await {
            Ok(response) => response_text(&response).unwrap_or_default(),
            Err(err) => {
                warn!("copy generation failed: {err}");
                String::new()
            }
        };

        debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            response_chars = text.len(),
            "model call finished"
        );
        text
    }
}

pub fn build_prompt(product: &str, audience: &str, platform: Platform) -> String {
    let platform = platform.label();
    format!(
        r#"
You are a professional digital marketing copywriter.
Generate exactly 5 ad copy variants for the product: "{product}".
Target audience: {audience}.
Platform: {platform}.

Each variant must:
- Be under 25 words
- Include a clear call-to-action
- Have a catchy tone suitable for {platform}

Output format strictly as:
1. <ad copy 1>
2. <ad copy 2>
3. <ad copy 3>
4. <ad copy 4>
5. <ad copy 5>
"#
    )
}
