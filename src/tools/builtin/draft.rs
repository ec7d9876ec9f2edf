//! Template-based draft generation handler.
//!
//! Composes a reply skeleton from tone, urgency, and response type — no
//! model call. The draft is a starting point for a human, not an outbound
//! message; nothing here sends email.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::error::HandlerError;
use crate::tools::ToolHandler;
use crate::tools::builtin::require_str;
use crate::tools::schema::GENERATE_DRAFT;

/// Composes a draft response from validated parameters.
pub struct GenerateDraftHandler;

#[async_trait]
impl ToolHandler for GenerateDraftHandler {
    fn name(&self) -> &str {
        GENERATE_DRAFT
    }

    async fn handle(&self, arguments: &Map<String, Value>) -> Result<Value, HandlerError> {
        let tone = require_str(arguments, GENERATE_DRAFT, "tone")?;
        let summary = require_str(arguments, GENERATE_DRAFT, "summary")?;
        let urgency = require_str(arguments, GENERATE_DRAFT, "urgency")?;
        let response_type = require_str(arguments, GENERATE_DRAFT, "response_type")?;

        let content = compose_draft(tone, summary, urgency, response_type);
        info!(tone, urgency, response_type, "Draft generated");

        Ok(json!({
            "status": "success",
            "draft": {
                "content": content,
                "tone": tone,
                "urgency": urgency,
                "response_type": response_type,
                "summary": summary,
                "timestamp": Utc::now().to_rfc3339(),
            }
        }))
    }
}

fn greeting(tone: &str) -> &'static str {
    match tone {
        "formal" => "Dear Sir/Madam,",
        "friendly" => "Hi there!",
        "apologetic" => "Dear [Name],",
        _ => "Hello,",
    }
}

fn urgency_phrase(urgency: &str) -> &'static str {
    match urgency {
        "high" => "I'll prioritize this and respond as soon as possible.",
        "medium" => "I'll respond to this shortly.",
        _ => "I'll get back to you when I have a chance.",
    }
}

fn compose_draft(tone: &str, summary: &str, urgency: &str, response_type: &str) -> String {
    let follow_up = urgency_phrase(urgency);
    let body = match response_type {
        "information_request" => format!(
            "I received your inquiry about {summary}. Let me gather the information you need. {follow_up}"
        ),
        "meeting_proposal" => format!(
            "Thank you for your meeting request regarding {summary}. I'd be happy to schedule a time to discuss this further. {follow_up}"
        ),
        "task_confirmation" => format!(
            "I've received your request about {summary} and will add it to my task list. {follow_up}"
        ),
        _ => format!("Thank you for reaching out regarding {summary}. {follow_up}"),
    };

    format!("{}\n\n{}\n\nBest regards,\nAI Assistant", greeting(tone), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arguments(tone: &str, response_type: &str) -> Map<String, Value> {
        json!({
            "tone": tone,
            "summary": "the Q3 report",
            "urgency": "high",
            "response_type": response_type
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[tokio::test]
    async fn formal_acknowledgment_draft() {
        let result = GenerateDraftHandler
            .handle(&arguments("formal", "acknowledgment"))
            .await
            .unwrap();
        let content = result["draft"]["content"].as_str().unwrap();
        assert!(content.starts_with("Dear Sir/Madam,"));
        assert!(content.contains("Thank you for reaching out regarding the Q3 report."));
        assert!(content.contains("prioritize this"));
        assert!(content.ends_with("Best regards,\nAI Assistant"));
    }

    #[tokio::test]
    async fn meeting_proposal_uses_its_template() {
        let result = GenerateDraftHandler
            .handle(&arguments("friendly", "meeting_proposal"))
            .await
            .unwrap();
        let content = result["draft"]["content"].as_str().unwrap();
        assert!(content.starts_with("Hi there!"));
        assert!(content.contains("meeting request regarding the Q3 report"));
    }

    #[test]
    fn low_urgency_phrase() {
        let draft = compose_draft("neutral", "billing", "low", "acknowledgment");
        assert!(draft.contains("when I have a chance"));
        assert!(draft.starts_with("Hello,"));
    }

    #[test]
    fn drafts_are_deterministic() {
        let a = compose_draft("apologetic", "the outage", "medium", "information_request");
        let b = compose_draft("apologetic", "the outage", "medium", "information_request");
        assert_eq!(a, b);
    }
}
