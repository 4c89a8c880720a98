use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use adify::generator::{GenerateContentResponse, GeneratorError};
use adify::pipeline::{run_action_with_progress, Stage, EXTRACTION_ERROR, VALIDATION_WARNING};
use adify::{run_action, score_text, CopyGenerator, CopyModel, CopyScorer, Outcome, Platform, UserRequest};

struct ScriptedModel {
    reply: Result<serde_json::Value, u16>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn text(text: &str) -> Arc<Self> {
        Self::body(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    fn body(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CopyModel for ScriptedModel {
    async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(body) => serde_json::from_value(body.clone())
                .map_err(|err| GeneratorError::Decode(err.to_string())),
            Err(status) => Err(GeneratorError::Api {
                status: *status,
                detail: "unavailable".to_string(),
            }),
        }
    }
}

const FIVE_LINES: &str = "1. Land interviews faster with AI-powered resume feedback. Try it free today!\n\
2. Your resume, reviewed in seconds.\n\
3. Join 10,000 job seekers who upgraded their resumes with instant, data-driven insights and tips.\n\
4. Stop guessing what recruiters want. Learn what your resume is missing now.\n\
5. Discover the keywords that get you hired.";

fn resume_request() -> UserRequest {
    UserRequest::new("AI Resume Analyzer", "job seekers", Platform::LinkedIn)
}

#[tokio::test]
async fn five_well_formed_lines_become_five_ranked_rows() {
    let model = ScriptedModel::text(FIVE_LINES);
    let generator = CopyGenerator::new(model.clone());

    let outcome = run_action(&generator, &CopyScorer::default(), &resume_request()).await;
    let report = match outcome {
        Outcome::Ok(report) => report,
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert_eq!(model.calls(), 1);
    assert_eq!(report.raw_text, FIVE_LINES);
    assert_eq!(report.variants.len(), 5);
    for pair in report.variants.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for variant in &report.variants {
        assert!(!variant.text.is_empty());
        assert_eq!(variant.score, score_text(&variant.text));
    }
    assert_eq!(report.best, report.variants[0]);

    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("\"AI Resume Analyzer\""));
    assert!(prompts[0].contains("Target audience: job seekers."));
    assert!(prompts[0].contains("Platform: LinkedIn."));
}

#[tokio::test]
async fn empty_product_warns_without_calling_the_model() {
    let model = ScriptedModel::text(FIVE_LINES);
    let generator = CopyGenerator::new(model.clone());
    let request = UserRequest::new("", "job seekers", Platform::Facebook);

    let outcome = run_action(&generator, &CopyScorer::default(), &request).await;

    assert!(matches!(&outcome, Outcome::ValidationError(message) if message == VALIDATION_WARNING));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn blank_audience_warns_without_calling_the_model() {
    let model = ScriptedModel::text(FIVE_LINES);
    let generator = CopyGenerator::new(model.clone());
    let request = UserRequest::new("AI Resume Analyzer", "   ", Platform::Instagram);

    let outcome = run_action(&generator, &CopyScorer::default(), &request).await;

    assert!(matches!(outcome, Outcome::ValidationError(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn model_failure_is_reported_as_empty_generation() {
    let model = ScriptedModel::failing(503);
    let generator = CopyGenerator::new(model.clone());

    let outcome = run_action(&generator, &CopyScorer::default(), &resume_request()).await;

    assert!(matches!(outcome, Outcome::GenerationEmpty));
    assert_eq!(outcome.message(), Some(EXTRACTION_ERROR));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn candidate_without_content_is_reported_as_empty_generation() {
    let model = ScriptedModel::body(serde_json::json!({
        "candidates": [{ "finishReason": "SAFETY" }]
    }));
    let generator = CopyGenerator::new(model);

    let outcome = run_action(&generator, &CopyScorer::default(), &resume_request()).await;

    assert!(matches!(outcome, Outcome::GenerationEmpty));
}

#[tokio::test]
async fn unnumbered_text_is_a_parse_failure_carrying_the_raw_text() {
    let model = ScriptedModel::text("I'm sorry, I can't write ads for that product.");
    let generator = CopyGenerator::new(model);

    let outcome = run_action(&generator, &CopyScorer::default(), &resume_request()).await;

    match outcome {
        Outcome::ParseEmpty { raw_text } => {
            assert_eq!(raw_text, "I'm sorry, I can't write ads for that product.")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn progress_reports_each_stage_in_order() {
    let model = ScriptedModel::text("1. Buy now!\n2. \n3. Try it today");
    let generator = CopyGenerator::new(model);
    let mut stages = Vec::new();

    let outcome = run_action_with_progress(
        &generator,
        &CopyScorer::default(),
        &resume_request(),
        |stage| stages.push(stage),
    )
    .await;

    assert!(matches!(outcome, Outcome::Ok(_)));
    assert_eq!(
        stages,
        vec![
            Stage::Start,
            Stage::Calling,
            Stage::Received,
            Stage::Parsed(2),
            Stage::Done
        ]
    );
}

#[tokio::test]
async fn actions_are_independent() {
    let model = ScriptedModel::text(FIVE_LINES);
    let generator = CopyGenerator::new(model.clone());
    let scorer = CopyScorer::default();

    let first = run_action(&generator, &scorer, &resume_request()).await;
    let second = run_action(&generator, &scorer, &resume_request()).await;

    match (first, second) {
        (Outcome::Ok(a), Outcome::Ok(b)) => assert_eq!(a.variants, b.variants),
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(model.calls(), 2);
}
