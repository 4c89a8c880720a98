use std::cmp::Ordering;

use crate::scoring::CopyScorer;
use crate::Variant;

pub fn score_variants(scorer: &CopyScorer, texts: Vec<String>) -> Vec<Variant> {
    texts
        .into_iter()
        .map(|text| {
            let score = scorer.score(&text);
            Variant { text, score }
        })
        .collect()
}

/// Descending by score. `sort_by` is stable, so ties keep generation order.
pub fn rank_variants(variants: &mut [Variant]) {
    variants.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

pub fn best_variant(ranked: &[Variant]) -> Option<&Variant> {
    ranked.first()
}
