//! Reqwest-backed `ModelClient` for a Claude-messages-style JSON endpoint.
//!
//! Maps transport and status failures onto the gateway's attempt-level
//! error taxonomy so the tiered invoker can apply its retry policy without
//! knowing anything about HTTP.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::ModelError;
use crate::llm::{ChatMessage, ModelClient, Role};
use crate::tools::schema::ToolDefinition;

/// API version header value the endpoint expects.
const API_VERSION: &str = "2023-06-01";

/// Max tokens to generate per request.
const MAX_TOKENS: u32 = 4000;

/// Sampling temperature — classification wants near-deterministic output.
const TEMPERATURE: f32 = 0.1;

/// HTTP model client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Messages endpoint URL.
    pub api_url: String,
    /// API key, sent as `x-api-key`.
    pub api_key: SecretString,
}

/// `ModelClient` implementation over HTTP.
pub struct HttpModelClient {
    http: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpModelClient {
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build the request body. System messages travel in the top-level
    /// `system` field; user/assistant turns go into `messages`.
    fn build_body(
        &self,
        model_id: &str,
        conversation: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Value {
        let system: Vec<&str> = conversation
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let messages: Vec<Value> = conversation
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                        Role::System => unreachable!("system messages filtered above"),
                    },
                    "content": m.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": model_id,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "messages": messages,
        });

        if !system.is_empty() {
            body["system"] = Value::String(system.join("\n\n"));
        }
        if !tools.is_empty() {
            body["tools"] = serde_json::to_value(tools).unwrap_or(Value::Null);
            body["tool_choice"] = json!({"type": "auto"});
        }

        body
    }

    /// Map an HTTP status to an attempt-level error.
    fn error_for_status(
        model_id: &str,
        status: reqwest::StatusCode,
        body: &str,
        retry_after: Option<Duration>,
    ) -> ModelError {
        let model = model_id.to_string();
        match status.as_u16() {
            401 | 403 => ModelError::AccessDenied { model },
            429 => ModelError::RateLimited { model, retry_after },
            500..=599 => ModelError::ServiceNotReady {
                model,
                reason: format!("upstream returned {status}"),
            },
            _ => ModelError::Network {
                model,
                reason: format!("unexpected status {status}: {}", truncate(body, 200)),
            },
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn invoke(
        &self,
        model_id: &str,
        conversation: &[ChatMessage],
        tools: &[ToolDefinition],
        timeout: Duration,
    ) -> Result<Value, ModelError> {
        let body = self.build_body(model_id, conversation, tools);
        debug!(model = %model_id, tools = tools.len(), "Sending model request");

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let model = model_id.to_string();
                if e.is_timeout() {
                    ModelError::Timeout { model, timeout }
                } else {
                    ModelError::Network {
                        model,
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            let text = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(model_id, status, &text, retry_after));
        }

        response.json::<Value>().await.map_err(|e| ModelError::Network {
            model: model_id.to_string(),
            reason: format!("failed to read response body: {e}"),
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
