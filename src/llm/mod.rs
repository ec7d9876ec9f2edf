//! Model-service integration.
//!
//! The gateway talks to hosted models through one injected capability,
//! [`ModelClient`]. Tiers differ only in the model identifier they pass to
//! it. `http` provides a reqwest-backed implementation for a
//! Claude-messages-style JSON endpoint; tests inject scripted mocks.

pub mod http;
pub mod normalize;

pub use http::HttpModelClient;
pub use normalize::{ContentBlock, NormalizedResponse, normalize};

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tools::schema::ToolDefinition;

/// Message role in a model conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Injected model-service capability.
///
/// Returns the provider's raw response body; the invoker hands it to the
/// normalizer, which owns all knowledge of response shapes. `timeout`
/// bounds this single attempt — the invoker additionally enforces it, so
/// implementations treat it as a hint for their transport layer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(
        &self,
        model_id: &str,
        conversation: &[ChatMessage],
        tools: &[ToolDefinition],
        timeout: Duration,
    ) -> Result<serde_json::Value, ModelError>;
}
