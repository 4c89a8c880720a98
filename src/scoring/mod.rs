pub mod readability;

use serde::Serialize;

use crate::config::ScoringConfig;

pub use readability::flesch_reading_ease;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub readability: f64,
    pub length_score: f64,
    pub cta_bonus: f64,
    pub total: f64,
}

/// Heuristic ad-copy scorer: readability, proximity to an ideal word count,
/// and a flat call-to-action bonus.
#[derive(Debug, Clone)]
pub struct CopyScorer {
    config: ScoringConfig,
}

impl Default for CopyScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl CopyScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, text: &str) -> f64 {
        self.breakdown(text).total
    }

    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let readability = flesch_reading_ease(text);
        let length_score = self.length_score(text);
        let cta_bonus = self.cta_bonus(text);

        let total = readability * self.config.readability_weight
            + length_score * self.config.length_weight
            + cta_bonus;

        ScoreBreakdown {
            readability,
            length_score,
            cta_bonus,
            total: round2(total),
        }
    }

    pub fn length_score(&self, text: &str) -> f64 {
        let words = text.split_whitespace().count();
        let deviation = words.abs_diff(self.config.ideal_words) as f64;
        (100.0 - deviation * self.config.penalty_per_word).max(0.0)
    }

    pub fn cta_bonus(&self, text: &str) -> f64 {
        if has_cta(text, &self.config.cta_words) {
            self.config.cta_bonus
        } else {
            0.0
        }
    }
}

/// Substring match on the lowercased text, so "shopping" and "trying" count.
pub fn has_cta(text: &str, vocabulary: &[String]) -> bool {
    let lowercase = text.to_lowercase();
    vocabulary
        .iter()
        .any(|word| !word.is_empty() && lowercase.contains(word.as_str()))
}

pub fn score_text(text: &str) -> f64 {
    CopyScorer::default().score(text)
}

pub fn score_breakdown(text: &str) -> ScoreBreakdown {
    CopyScorer::default().breakdown(text)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
