//! Audit record construction.
//!
//! The gateway builds audit entries; persisting them is the caller's
//! responsibility. One record is created when processing starts and
//! completed (or marked errored) when it finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::invoker::Tier;
use crate::pipeline::types::{EmailRequest, GatewayResult};

/// Processing status recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    ProcessingStarted,
    Completed,
    Error,
}

/// One audit trail entry for an inbound email.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Request id, shared with the `GatewayResult`.
    pub email_id: Uuid,
    /// When this record was created.
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub status: AuditStatus,
    pub email_subject: String,
    pub email_sender: String,
    /// Tier that produced the result; set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_used: Option<Tier>,
    /// Attempts within the successful tier; set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    /// Number of tool calls routed; set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<usize>,
    /// Wall-clock processing time; set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Metadata bag copied from the request.
    pub metadata: Map<String, Value>,
}

impl AuditRecord {
    /// Record that processing of a request has started.
    pub fn started(request_id: Uuid, request: &EmailRequest) -> Self {
        Self {
            email_id: request_id,
            timestamp: Utc::now(),
            user_id: request.user_id.clone(),
            status: AuditStatus::ProcessingStarted,
            email_subject: request.subject.clone(),
            email_sender: request.sender.clone(),
            tier_used: None,
            attempts: None,
            tool_calls: None,
            elapsed_ms: None,
            completed_at: None,
            metadata: request.metadata.clone(),
        }
    }

    /// Mark the record completed with the processing result.
    pub fn completed(mut self, result: &GatewayResult) -> Self {
        self.status = AuditStatus::Completed;
        self.tier_used = Some(result.outcome.tier_used);
        self.attempts = Some(result.outcome.attempts);
        self.tool_calls = Some(result.routed.len());
        self.elapsed_ms = Some(result.outcome.elapsed.as_millis() as u64);
        self.completed_at = Some(Utc::now());
        self
    }

    /// Mark the record errored. Only caller-side failures reach this —
    /// tier failures resolve through the rule-based floor instead.
    pub fn errored(mut self) -> Self {
        self.status = AuditStatus::Error;
        self.completed_at = Some(Utc::now());
        self
    }
}
