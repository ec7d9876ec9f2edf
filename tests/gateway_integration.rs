//! End-to-end gateway tests with a scripted model client.
//!
//! Exercises the full pipeline: conversation building, tiered invocation
//! with backoff, response normalization, validation, and routing through
//! the built-in handlers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;
use uuid::Uuid;

use email_intel::audit::{AuditRecord, AuditStatus};
use email_intel::config::GatewayConfig;
use email_intel::error::ModelError;
use email_intel::invoker::Tier;
use email_intel::llm::{ChatMessage, ModelClient};
use email_intel::pipeline::{EmailRequest, Gateway, RouteDisposition};
use email_intel::tools::schema::ToolDefinition;

/// Model client driven by a per-call script. Records invocation times so
/// tests can assert the backoff schedule under paused virtual time.
struct ScriptedClient {
    script: Mutex<VecDeque<Result<Value, ModelError>>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<Value, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn invoke(
        &self,
        model_id: &str,
        _conversation: &[ChatMessage],
        _tools: &[ToolDefinition],
        _timeout: Duration,
    ) -> Result<Value, ModelError> {
        self.calls
            .lock()
            .unwrap()
            .push((model_id.to_string(), Instant::now()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ModelError::Network {
                    model: model_id.to_string(),
                    reason: "script exhausted".into(),
                })
            })
    }
}

fn transient() -> ModelError {
    ModelError::RateLimited {
        model: "scripted".into(),
        retry_after: None,
    }
}

fn denied() -> ModelError {
    ModelError::AccessDenied {
        model: "scripted".into(),
    }
}

fn request(body: &str) -> EmailRequest {
    serde_json::from_value(json!({
        "subject": "Hello",
        "sender": "alice@example.com",
        "recipient": "support@example.com",
        "body": body,
        "user_id": "user-42",
        "metadata": {"channel": "api"}
    }))
    .unwrap()
}

fn gateway(client: Arc<ScriptedClient>) -> Gateway {
    Gateway::new(
        client,
        GatewayConfig {
            primary_model_id: "model-primary".into(),
            secondary_model_id: "model-secondary".into(),
            ..GatewayConfig::default()
        },
    )
}

#[tokio::test(start_paused = true)]
async fn every_failure_sequence_still_returns_a_classification() {
    // Worst case: primary exhausts transient retries, secondary is denied
    // outright. The rule-based floor must still produce a routed result.
    let client = ScriptedClient::new(vec![
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Err(denied()),
    ]);
    let result = gateway(Arc::clone(&client))
        .process(request("URGENT: the server is broken, please help asap"))
        .await;

    assert_eq!(result.outcome.tier_used, Tier::RuleBased);
    assert_eq!(result.outcome.attempts, 1);
    assert!(!result.outcome.tool_calls.is_empty());

    // The floor's classify_email call validates and executes.
    assert_eq!(result.routed.len(), 1);
    match &result.routed[0].disposition {
        RouteDisposition::Executed { result } => {
            assert_eq!(result["classification"]["email_type"], "complaint");
            assert_eq!(result["classification"]["priority"], "urgent");
        }
        other => panic!("Expected Executed, got {:?}", other),
    }
    assert_eq!(client.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn backoff_schedule_across_tier_boundary() {
    // Primary: 3 transient failures at t=0, t=1s, t=3s (backoff 1s then
    // 2s). Secondary succeeds immediately at t=3s — no suspension before
    // the 4th tier-level call.
    let client = ScriptedClient::new(vec![
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Ok(json!({
            "content": [{
                "type": "tool_use",
                "name": "classify_email",
                "input": {"email_type": "inquiry", "priority": "low", "category": "question"}
            }]
        })),
    ]);
    let start = Instant::now();
    let result = gateway(Arc::clone(&client)).process(request("quick question")).await;

    assert_eq!(result.outcome.tier_used, Tier::Secondary);
    assert_eq!(result.outcome.attempts, 1);

    let calls = client.calls();
    let offsets: Vec<Duration> = calls.iter().map(|(_, at)| *at - start).collect();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(3),
        ]
    );
    assert_eq!(calls[2].0, "model-primary");
    assert_eq!(calls[3].0, "model-secondary");
}

#[tokio::test(start_paused = true)]
async fn access_denied_records_one_attempt_not_three() {
    let client = ScriptedClient::new(vec![
        Err(denied()),
        Ok(json!({
            "content": [{
                "type": "tool_use",
                "name": "classify_email",
                "input": {"email_type": "other", "priority": "low", "category": "misc"}
            }]
        })),
    ]);
    let start = Instant::now();
    let result = gateway(Arc::clone(&client)).process(request("hello")).await;

    assert_eq!(result.outcome.tier_used, Tier::Secondary);
    let calls = client.calls();
    assert_eq!(
        calls.iter().filter(|(model, _)| model == "model-primary").count(),
        1
    );
    // Short-circuit spends no backoff time.
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn both_wire_shapes_produce_identical_results() {
    let input = json!({
        "tone": "friendly",
        "summary": "lunch plans",
        "urgency": "low",
        "response_type": "acknowledgment"
    });
    let nested = ScriptedClient::new(vec![Ok(json!({
        "content": [{"tool_use": {"name": "generate_draft", "input": input.clone()}}]
    }))]);
    let flat = ScriptedClient::new(vec![Ok(json!({
        "content": [{"type": "tool_use", "name": "generate_draft", "input": input}]
    }))]);

    let from_nested = gateway(nested).process(request("lunch?")).await;
    let from_flat = gateway(flat).process(request("lunch?")).await;

    assert_eq!(
        from_nested.outcome.tool_calls,
        from_flat.outcome.tool_calls
    );
    let drafts = [&from_nested, &from_flat].map(|r| match &r.routed[0].disposition {
        RouteDisposition::Executed { result } => result["draft"]["content"]
            .as_str()
            .unwrap()
            .to_string(),
        other => panic!("Expected Executed, got {:?}", other),
    });
    assert_eq!(drafts[0], drafts[1]);
}

#[tokio::test(start_paused = true)]
async fn schedule_call_scenario_classifies_as_medium_meeting_request() {
    // No urgent keywords, body ≥ 100 chars, "schedule" present:
    // meeting_request at medium priority through the rule-based path.
    let body = format!(
        "Can we schedule a call for Tuesday? {}",
        "There are a few agenda points I want to cover and it would help to have everyone in the room."
    );
    assert!(body.chars().count() >= 100);

    let client = ScriptedClient::new(vec![
        Err(denied()),
        Err(denied()),
    ]);
    let result = gateway(client).process(request(&body)).await;

    assert_eq!(result.outcome.tier_used, Tier::RuleBased);
    let call = &result.outcome.tool_calls[0];
    assert_eq!(call.arguments["email_type"], "meeting_request");
    assert_eq!(call.arguments["priority"], "medium");
}

#[tokio::test(start_paused = true)]
async fn invalid_model_arguments_are_rejected_not_executed() {
    // Model omits two required fields and mistypes duration: the call is
    // rejected with all three violations, nothing executes.
    let client = ScriptedClient::new(vec![Ok(json!({
        "content": [{
            "type": "tool_use",
            "name": "schedule_meeting",
            "input": {"date": "2026-03-02", "time": "14:00", "duration": "an hour"}
        }]
    }))]);
    let result = gateway(client).process(request("set up a meeting")).await;

    match &result.routed[0].disposition {
        RouteDisposition::Rejected { validation_errors } => {
            assert_eq!(validation_errors.len(), 3);
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn audit_record_tracks_the_full_lifecycle() {
    let client = ScriptedClient::new(vec![
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Err(transient()),
    ]);
    let inbound = request("todo: file the report before the deadline");
    let request_id = Uuid::new_v4();

    let audit = AuditRecord::started(request_id, &inbound);
    assert_eq!(audit.status, AuditStatus::ProcessingStarted);

    let result = gateway(client).process_with_id(request_id, inbound).await;
    let audit = audit.completed(&result);

    assert_eq!(audit.status, AuditStatus::Completed);
    assert_eq!(audit.email_id, result.request_id);
    assert_eq!(audit.tier_used, Some(Tier::RuleBased));
    assert_eq!(audit.attempts, Some(1));
    assert_eq!(audit.tool_calls, Some(1));
    assert!(audit.elapsed_ms.is_some());
    assert_eq!(audit.user_id, "user-42");
}
