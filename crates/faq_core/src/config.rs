use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::retrieval::DEFAULT_TOP_K;

pub const DEFAULT_FAQ_PATH: &str = "data/faq.json";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_MAX_TOKENS: u32 = 600;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

pub const ENV_FAQ_PATH: &str = "FAQ_PATH";
pub const ENV_TOP_K: &str = "TOP_K";
pub const ENV_MODEL_ID: &str = "MODEL_ID";
pub const ENV_MAX_TOKENS: &str = "MAX_TOKENS";
pub const ENV_TEMPERATURE: &str = "TEMPERATURE";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub faq_path: PathBuf,
    pub top_k: usize,
    pub generation: GenerationConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            faq_path: PathBuf::from(DEFAULT_FAQ_PATH),
            top_k: DEFAULT_TOP_K,
            generation: GenerationConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to the defaults for keys it
    /// does not know.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_FAQ_PATH) {
            config.faq_path = PathBuf::from(path);
        }
        if let Some(model_id) = lookup(ENV_MODEL_ID) {
            config.generation.model_id = model_id;
        }
        if let Some(raw) = lookup(ENV_TOP_K) {
            config.top_k = parse(ENV_TOP_K, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_TOKENS) {
            config.generation.max_tokens = parse(ENV_MAX_TOKENS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TEMPERATURE) {
            config.generation.temperature = parse(ENV_TEMPERATURE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TOP_K,
                value: self.top_k.to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        if !self.generation.temperature.is_finite() || self.generation.temperature < 0.0 {
            return Err(ConfigError::Invalid {
                key: ENV_TEMPERATURE,
                value: self.generation.temperature.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

fn parse<T>(key: &'static str, raw: &str) -> std::result::Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
