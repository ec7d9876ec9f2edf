//! Gateway processor — the fixed 4-step pipeline.
//!
//! Flow:
//! 1. Build the model conversation from the inbound email
//! 2. Tiered invocation (retry → fallback model → rule-based floor)
//! 3. Validate + route every tool call (independently, concurrently)
//! 4. Aggregate the result for the caller, who owns persistence
//!
//! Tier-level errors never escape `process` — the rule-based floor
//! guarantees a classification-shaped result for every request.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::invoker::TieredInvoker;
use crate::llm::{ChatMessage, ModelClient};
use crate::pipeline::types::{EmailRequest, GatewayResult, RouteDisposition, RoutedToolCall};
use crate::tools::router::{RouteOutcome, ToolRouter};
use crate::tools::schema::ToolDefinition;
use crate::tools::SchemaRegistry;

/// The request-classification gateway.
pub struct Gateway {
    invoker: TieredInvoker,
    router: ToolRouter,
    tool_definitions: Vec<ToolDefinition>,
}

impl Gateway {
    /// Create a gateway with the built-in schema registry and handlers.
    pub fn new(client: Arc<dyn ModelClient>, config: GatewayConfig) -> Self {
        let registry = Arc::new(SchemaRegistry::builtin());
        let router = ToolRouter::with_builtin_handlers(Arc::clone(&registry));
        Self::with_router(client, config, registry, router)
    }

    /// Create a gateway with a caller-supplied router (custom handlers).
    pub fn with_router(
        client: Arc<dyn ModelClient>,
        config: GatewayConfig,
        registry: Arc<SchemaRegistry>,
        router: ToolRouter,
    ) -> Self {
        Self {
            invoker: TieredInvoker::new(client, config),
            router,
            tool_definitions: registry.tool_definitions(),
        }
    }

    /// Process one inbound email end to end.
    pub async fn process(&self, request: EmailRequest) -> GatewayResult {
        self.process_with_id(Uuid::new_v4(), request).await
    }

    /// Process with a caller-chosen request id (for audit correlation).
    pub async fn process_with_id(
        &self,
        request_id: Uuid,
        request: EmailRequest,
    ) -> GatewayResult {
        info!(
            %request_id,
            sender = %request.sender,
            subject = %request.subject,
            "Processing inbound email"
        );

        let conversation = vec![
            ChatMessage::system(build_system_prompt()),
            ChatMessage::user(build_email_prompt(&request)),
        ];

        let outcome = self
            .invoker
            .invoke(&conversation, &self.tool_definitions)
            .await;

        if outcome.tool_calls.is_empty() {
            info!(%request_id, tier = outcome.tier_used.label(), "No tool calls in response");
        }

        // Independent per call: validate and dispatch concurrently.
        let routed = join_all(outcome.tool_calls.iter().map(|call| async {
            let disposition = match self.router.route(call).await {
                Ok(RouteOutcome::Executed { result }) => RouteDisposition::Executed { result },
                Ok(RouteOutcome::Rejected { validation }) => {
                    warn!(
                        %request_id,
                        tool = %call.name,
                        errors = validation.errors.len(),
                        "Tool call failed validation"
                    );
                    RouteDisposition::Rejected {
                        validation_errors: validation.errors,
                    }
                }
                Err(e) => {
                    warn!(%request_id, tool = %call.name, error = %e, "Tool handler failed");
                    RouteDisposition::Failed {
                        message: e.to_string(),
                    }
                }
            };
            RoutedToolCall {
                call: call.clone(),
                disposition,
            }
        }))
        .await;

        info!(
            %request_id,
            tier = outcome.tier_used.label(),
            attempts = outcome.attempts,
            routed = routed.len(),
            "Email processing complete"
        );

        GatewayResult {
            request_id,
            outcome,
            routed,
            processed_at: Utc::now(),
        }
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the system prompt for email processing.
fn build_system_prompt() -> String {
    "You are an AI email assistant for professional organizations. Your job is to:\n\n\
     1. ANALYZE the email content to determine if a response is needed\n\
     2. CLASSIFY the email by type, priority, and category\n\
     3. GENERATE an appropriate draft response when one is needed\n\
     4. SCHEDULE meetings when requested\n\
     5. CREATE tasks for follow-up actions\n\n\
     Rules:\n\
     - When calling tools, you MUST provide ALL required arguments\n\
     - If unsure about any argument, ask for clarification rather than guessing\n\
     - Always provide meaningful summaries and descriptions\n\
     - Use appropriate tone and urgency levels\n\n\
     Available tools:\n\
     - classify_email: requires email_type, priority, category\n\
     - generate_draft: requires tone, summary, urgency, response_type\n\
     - schedule_meeting: requires date, time, duration, attendees, meeting_title\n\
     - create_task: requires title, description, due_date, priority, assignee\n\n\
     If no action is needed, respond with: {\"action\": \"skip\", \"reason\": \"brief explanation\"}"
        .to_string()
}

/// Format the inbound email as the user message.
fn build_email_prompt(request: &EmailRequest) -> String {
    let mut prompt = String::with_capacity(256 + request.body.len());

    prompt.push_str(&format!("Subject: {}\n", non_empty(&request.subject, "No Subject")));
    prompt.push_str(&format!("From: {}\n", non_empty(&request.sender, "Unknown Sender")));
    prompt.push_str(&format!("To: {}\n", non_empty(&request.recipient, "Unknown Recipient")));
    prompt.push('\n');
    prompt.push_str(non_empty(&request.body, "No content"));

    if !request.metadata.is_empty() {
        prompt.push_str(&format!(
            "\n\nMetadata: {}",
            serde_json::Value::Object(request.metadata.clone())
        ));
    }

    prompt
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
