//! Shared types for the email processing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::invoker::InvocationOutcome;
use crate::tools::validate::FieldError;
use crate::tools::ToolCall;

/// Inbound email payload.
///
/// Created once per request by the caller; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Sender address.
    #[serde(default)]
    pub sender: String,
    /// Recipient address.
    #[serde(default)]
    pub recipient: String,
    /// Message body text.
    #[serde(default)]
    pub body: String,
    /// Opaque user identifier for audit correlation.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Open key-value metadata bag, passed through untouched.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

/// Per-call routing disposition.
///
/// Sibling tool calls in one response are independent: one call's
/// rejection or handler failure never affects the others.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteDisposition {
    /// Arguments validated and the handler produced a result.
    Executed { result: Value },
    /// Arguments failed validation; the handler never ran.
    Rejected { validation_errors: Vec<FieldError> },
    /// Arguments validated but the handler itself failed.
    Failed { message: String },
}

impl RouteDisposition {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Executed { .. } => "executed",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
        }
    }
}

/// One tool call together with what routing did with it.
#[derive(Debug, Clone, Serialize)]
pub struct RoutedToolCall {
    pub call: ToolCall,
    pub disposition: RouteDisposition,
}

/// Aggregated result of processing one inbound email.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayResult {
    /// Unique id for this request, for audit correlation.
    pub request_id: Uuid,
    /// The tiered invocation's terminal artifact.
    pub outcome: InvocationOutcome,
    /// Routing dispositions, one per tool call in `outcome`.
    pub routed: Vec<RoutedToolCall>,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}
