pub mod config;
pub mod export;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod ranking;
pub mod scoring;

use serde::{Deserialize, Serialize};

pub use generator::{CopyGenerator, CopyModel, GeminiClient, GeneratorError};
pub use parser::parse_variants;
pub use pipeline::{run_action, Outcome};
pub use ranking::rank_variants;
pub use scoring::{score_breakdown, score_text, CopyScorer, ScoreBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    LinkedIn,
    Instagram,
    GoogleAds,
    TwitterX,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Facebook,
        Platform::LinkedIn,
        Platform::Instagram,
        Platform::GoogleAds,
        Platform::TwitterX,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "facebook" | "fb" => Some(Platform::Facebook),
            "linkedin" => Some(Platform::LinkedIn),
            "instagram" | "ig" => Some(Platform::Instagram),
            "google ads" | "google-ads" | "google_ads" | "googleads" | "google" => {
                Some(Platform::GoogleAds)
            }
            "twitter / x" | "twitter/x" | "twitter-x" | "twitterx" | "twitter" | "x" => {
                Some(Platform::TwitterX)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::GoogleAds => "Google Ads",
            Platform::TwitterX => "Twitter / X",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One generation action's inputs. Lives only for the duration of the action.
#[derive(Debug, Clone)]
pub struct UserRequest {
    pub product: String,
    pub audience: String,
    pub platform: Platform,
}

impl UserRequest {
    pub fn new(product: impl Into<String>, audience: impl Into<String>, platform: Platform) -> Self {
        Self {
            product: product.into(),
            audience: audience.into(),
            platform,
        }
    }

    /// Both free-text fields must carry something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.product.trim().is_empty() && !self.audience.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub raw_text: String,
    pub variants: Vec<Variant>,
    pub best: Variant,
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
