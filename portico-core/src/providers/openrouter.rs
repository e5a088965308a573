//! OpenRouter chat-completions backend.
//!
//! Speaks the OpenAI-compatible chat completions API against OpenRouter,
//! which fronts every model in the rotation list behind one endpoint and
//! one API key.

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::providers::CompletionBackend;
use crate::types::ChatTurn;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

/// OpenAI-compatible backend for the OpenRouter API.
pub struct OpenRouterBackend {
    client: Client,
    base_url: String,
    api_key: String,
    max_tokens: usize,
    temperature: f32,
}

impl OpenRouterBackend {
    /// Create a backend from configuration.
    ///
    /// Resolves the API key from the explicit config value or the
    /// configured environment variable.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.resolve_api_key().map_err(|_| LlmError::AuthFailed {
            backend: format!("openrouter: env var '{}' not set", config.api_key_env),
        })?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn messages_to_json(messages: &[ChatTurn]) -> Vec<Value> {
        messages
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.to_string(),
                    "content": turn.content,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    async fn complete(&self, messages: &[ChatTurn], model: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": model,
            "messages": Self::messages_to_json(messages),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        debug!(model, message_count = messages.len(), "sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Connection {
                message: e.to_string(),
            })?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => {
                return Err(LlmError::QuotaExceeded {
                    model: model.to_string(),
                });
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LlmError::AuthFailed {
                    backend: "openrouter".to_string(),
                });
            }
            s if !s.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiRequest {
                    message: format!("HTTP {status}: {detail}"),
                });
            }
            _ => {}
        }

        let payload: Value = response.json().await.map_err(|e| LlmError::ResponseParse {
            message: e.to_string(),
        })?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::ResponseParse {
                message: "missing choices[0].message.content".to_string(),
            })?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(LlmError::EmptyResponse {
                model: model.to_string(),
            });
        }

        if let Some(usage) = payload.get("usage") {
            debug!(model, %usage, "completion usage");
        }

        Ok(trimmed.to_string())
    }
}
