use tracing::info;

use crate::generator::CopyGenerator;
use crate::parser::parse_variants;
use crate::ranking::{best_variant, rank_variants, score_variants};
use crate::scoring::CopyScorer;
use crate::{GenerationReport, UserRequest};

pub const VALIDATION_WARNING: &str = "Please fill all fields before generating.";
pub const EXTRACTION_ERROR: &str = "Couldn't extract ad copies from response. Try again.";

/// Result of one user-triggered action. Every variant is scoped to that
/// action and leaves nothing behind for the next one.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok(GenerationReport),
    ValidationError(String),
    GenerationEmpty,
    ParseEmpty { raw_text: String },
}

impl Outcome {
    /// User-facing message for the failure variants.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::ValidationError(message) => Some(message),
            Outcome::GenerationEmpty | Outcome::ParseEmpty { .. } => Some(EXTRACTION_ERROR),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Calling,
    Received,
    Parsed(usize),
    Done,
}

impl Stage {
    pub fn event(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Calling => "calling",
            Stage::Received => "received",
            Stage::Parsed(_) => "parsed",
            Stage::Done => "done",
        }
    }

    pub fn message(self) -> String {
        match self {
            Stage::Start => "Preparing prompt".to_string(),
            Stage::Calling => "Crafting ad variants".to_string(),
            Stage::Received => "Received model response".to_string(),
            Stage::Parsed(count) => format!("Extracted {} variants", count),
            Stage::Done => "Scoring complete".to_string(),
        }
    }
}

pub async fn run_action(
    generator: &CopyGenerator,
    scorer: &CopyScorer,
    request: &UserRequest,
) -> Outcome {
    run_action_with_progress(generator, scorer, request, |_| {}).await
}

/// Validate, generate, parse, score, rank. Aborts at the first empty step.
pub async fn run_action_with_progress<F>(
    generator: &CopyGenerator,
    scorer: &CopyScorer,
    request: &UserRequest,
    mut progress: F,
) -> Outcome
where
    F: FnMut(Stage),
{
    if !request.is_complete() {
        return Outcome::ValidationError(VALIDATION_WARNING.to_string());
    }

    progress(Stage::Start);
    info!(platform = %request.platform, "generating ad copy variants");

    progress(Stage::Calling);
    let raw_text = generator.generate(request).await;
    progress(Stage::Received);
    if raw_text.trim().is_empty() {
        return Outcome::GenerationEmpty;
    }

    let texts = parse_variants(&raw_text);
    progress(Stage::Parsed(texts.len()));
    if texts.is_empty() {
        return Outcome::ParseEmpty { raw_text };
    }

    let mut variants = score_variants(scorer, texts);
    rank_variants(&mut variants);
    let best = match best_variant(&variants) {
        Some(best) => best.clone(),
        None => return Outcome::ParseEmpty { raw_text },
    };

    info!(variants = variants.len(), best_score = best.score, "ranked ad copy variants");
    progress(Stage::Done);

    Outcome::Ok(GenerationReport {
        raw_text,
        variants,
        best,
    })
}
