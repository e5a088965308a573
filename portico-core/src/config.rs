//! Configuration system for Portico.
//!
//! Uses `figment` for layered configuration: defaults -> config file ->
//! environment. A local `.env` file is honored before environment lookup
//! so the OpenRouter key can live alongside the deployment.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for the assistant core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
}

/// Configuration for the generation backend and model rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible chat completions endpoint.
    pub base_url: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Explicit API key; takes precedence over `api_key_env` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Ranked model rotation list. The first entry is the primary model;
    /// later entries are tried in order on failure.
    pub models: Vec<String>,
    /// Maximum tokens to generate in a response.
    pub max_tokens: usize,
    /// Sampling temperature for generation.
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            models: vec![
                "anthropic/claude-3.5-sonnet".to_string(),
                "openai/gpt-4o".to_string(),
                "anthropic/claude-3-haiku".to_string(),
                "google/gemma-2-9b-it:free".to_string(),
            ],
            max_tokens: 500,
            temperature: 0.3,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: explicit config value first, then the
    /// configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env).map_err(|_| ConfigError::EnvVarMissing {
            var: self.api_key_env.clone(),
        })
    }
}

/// Load configuration from defaults, an optional TOML file, and the
/// environment (`PORTICO_LLM__MAX_TOKENS`, etc.).
pub fn load_config(config_file: Option<&Path>) -> Result<AssistantConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let mut figment = Figment::from(Serialized::defaults(AssistantConfig::default()));

    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("PORTICO_").split("__"));

    figment
        .extract()
        .map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
        .and_then(validate)
}

fn validate(config: AssistantConfig) -> Result<AssistantConfig, ConfigError> {
    if config.llm.models.is_empty() {
        return Err(ConfigError::MissingField {
            field: "llm.models".to_string(),
        });
    }
    Ok(config)
}
