use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CONFIG_PATH: &str = "config/adify.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub api_base: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub readability_weight: f64,
    pub length_weight: f64,
    pub ideal_words: usize,
    pub penalty_per_word: f64,
    pub cta_bonus: f64,
    pub cta_words: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            readability_weight: 0.5,
            length_weight: 0.3,
            ideal_words: 15,
            penalty_per_word: 3.0,
            cta_bonus: 20.0,
            cta_words: ["buy", "shop", "try", "join", "learn", "discover"]
                .iter()
                .map(|word| word.to_string())
                .collect(),
        }
    }
}

/// The file-backed part of the configuration. The API key never lives here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub generator: GeneratorConfig,
    pub scoring: ScoringConfig,
}

impl FileConfig {
    /// Loads `path`, else `ADIFY_CONFIG_PATH`, else `config/adify.toml`.
    /// Only the last one may be absent; a named file that is missing is an error.
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match path.or_else(env_config_path) {
            Some(path) => Ok((Self::read(&path)?, Some(path))),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Ok((Self::read(&path)?, Some(path)))
                } else {
                    Ok((FileConfig::default(), None))
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(model) = env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                self.generator.model = model;
            }
        }
        if let Ok(api_base) = env::var("GEMINI_API_BASE") {
            if !api_base.trim().is_empty() {
                self.generator.api_base = api_base;
            }
        }
    }
}

/// Process-wide configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub generator: GeneratorConfig,
    pub scoring: ScoringConfig,
}

impl Settings {
    pub fn new(api_key: impl Into<String>, generator: GeneratorConfig, scoring: ScoringConfig) -> Self {
        Self {
            api_key: api_key.into(),
            generator,
            scoring,
        }
    }

    /// Reads the optional TOML file, then the environment. A `model_override`
    /// (from the command line) wins over both.
    pub fn load(path: Option<PathBuf>, model_override: Option<String>) -> Result<Self, ConfigError> {
        let (mut file, _) = FileConfig::load(path)?;
        file.apply_env_overrides();
        if let Some(model) = model_override.filter(|value| !value.trim().is_empty()) {
            file.generator.model = model;
        }

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self::new(api_key, file.generator, file.scoring))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.generator.api_base.trim_end_matches('/'),
            self.generator.model
        )
    }
}

pub fn load_dotenv(manifest_dir: &Path) {
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_path(manifest_dir.join(".env"));
}

fn env_config_path() -> Option<PathBuf> {
    env::var("ADIFY_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
