//! Environment-driven configuration for the model provider

use super::gemini::{GeminiService, DEFAULT_BASE_URL, DEFAULT_MODEL};
use super::{GenerationConfig, LlmService, LoggingService};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration errors surfaced at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("Failed to create model service: {0}")]
    Service(String),
}

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub generation: GenerationConfig,
    /// Persona name for the generic "Act as ..." template
    pub persona: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            generation: GenerationConfig::default(),
            persona: None,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = parse_var(&var, "GEMINI_TIMEOUT_SECS", "a positive integer", |secs: &u64| {
            *secs > 0
        })?
        .map_or(defaults.timeout, Duration::from_secs);

        let generation = GenerationConfig {
            temperature: parse_var(&var, "GEMINI_TEMPERATURE", "a number between 0 and 2", |t: &f32| {
                (0.0..=2.0).contains(t)
            })?,
            max_output_tokens: parse_var(
                &var,
                "GEMINI_MAX_OUTPUT_TOKENS",
                "a positive integer",
                |n: &u32| *n > 0,
            )?,
        };

        Ok(Self {
            api_key: var("GEMINI_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout,
            generation,
            persona: var("ORACLE_PERSONA"),
        })
    }

    /// Create the logging-wrapped Gemini service
    pub fn build_service(&self) -> Result<Arc<dyn LlmService>, ConfigError> {
        let api_key = self.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
        let service = GeminiService::new(api_key, &self.model, &self.base_url, self.timeout)
            .map_err(|e| ConfigError::Service(e.message))?;
        Ok(Arc::new(LoggingService::new(Arc::new(service))))
    }
}

/// Parse an optional variable, rejecting values that fail `valid`
fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    valid: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Ok(Some(value)),
        _ => Err(ConfigError::InvalidValue {
            var: name,
            expected,
            value: raw,
        }),
    }
}
