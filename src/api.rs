use serde::{Deserialize, Serialize};
use adify::{GenerationReport, Platform, UserRequest, Variant};

#[derive(Debug, Deserialize)]
pub struct ApiGenerateRequest {
    pub product: Option<String>,
    pub audience: Option<String>,
    pub platform: Option<String>,
    pub request_id: Option<String>,
}

impl ApiGenerateRequest {
    /// Empty text fields pass through; the pipeline owns that warning.
    pub fn into_request(self) -> Result<UserRequest, String> {
        let platform = match self.platform.as_deref() {
            Some(value) if !value.trim().is_empty() => Platform::from_str(value)
                .ok_or_else(|| format!("invalid platform: {}", value))?,
            _ => Platform::Facebook,
        };

        Ok(UserRequest::new(
            self.product.unwrap_or_default().trim(),
            self.audience.unwrap_or_default().trim(),
            platform,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVariantRow {
    pub variant: String,
    pub score: f64,
}

impl From<&Variant> for ApiVariantRow {
    fn from(variant: &Variant) -> Self {
        Self {
            variant: variant.text.clone(),
            score: variant.score,
        }
    }
}

impl From<ApiVariantRow> for Variant {
    fn from(row: ApiVariantRow) -> Self {
        Variant {
            text: row.variant,
            score: row.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiGenerateResponse {
    pub request_id: String,
    pub raw_text: String,
    pub variants: Vec<ApiVariantRow>,
    pub best: ApiVariantRow,
    pub csv: String,
}

impl ApiGenerateResponse {
    pub fn from_report(report: GenerationReport, csv: String, request_id: String) -> Self {
        Self {
            request_id,
            variants: report.variants.iter().map(ApiVariantRow::from).collect(),
            best: ApiVariantRow::from(&report.best),
            raw_text: report.raw_text,
            csv,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub request_id: Option<String>,
    pub error: String,
    pub raw_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiExportRequest {
    pub variants: Vec<ApiVariantRow>,
}
