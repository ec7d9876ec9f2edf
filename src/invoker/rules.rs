//! Rule-based classification — the deterministic floor tier.
//!
//! Keyword matching only: no model, no I/O, no failure mode. When both
//! model tiers are exhausted this classifier guarantees the request still
//! terminates with a usable `classify_email` call.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::tools::ToolCall;
use crate::tools::schema::CLASSIFY_EMAIL;

/// Marker prefix on rule-based category strings, for downstream
/// observability — consumers can tell a floor-tier result from a model one.
pub const RULE_BASED_MARKER: &str = "Rule-based classification";

/// Bodies shorter than this many characters default to low priority.
const SHORT_BODY_CHARS: usize = 100;

/// One email-type detection rule: first match (in declaration order) wins.
struct TypeRule {
    email_type: &'static str,
    keywords: Regex,
}

/// Deterministic keyword classifier.
pub struct RuleBasedClassifier {
    type_rules: Vec<TypeRule>,
    urgent: Regex,
    urgent_adjacent: Regex,
}

impl RuleBasedClassifier {
    /// Build the classifier with its fixed keyword sets.
    ///
    /// Matching is case-insensitive substring membership, so "errors" and
    /// "URGENT:" hit the `error` and `urgent` keywords.
    pub fn new() -> Self {
        let rule = |email_type, pattern: &str| TypeRule {
            email_type,
            keywords: Regex::new(pattern).expect("static keyword pattern compiles"),
        };
        Self {
            type_rules: vec![
                rule("meeting_request", r"(?i)(meeting|schedule|calendar|zoom|teams)"),
                rule("task_assignment", r"(?i)(task|todo|action item|deadline)"),
                rule("complaint", r"(?i)(complaint|issue|problem|broken|error)"),
                rule("inquiry", r"(?i)(question|inquiry|asking|clarification)"),
            ],
            urgent: Regex::new(r"(?i)(urgent|asap|immediately|critical|emergency)")
                .expect("static keyword pattern compiles"),
            urgent_adjacent: Regex::new(r"(?i)important").expect("static keyword pattern compiles"),
        }
    }

    /// Classify an email body. Total: always returns a `classify_email`
    /// tool call whose arguments pass schema validation.
    pub fn classify(&self, body_text: &str) -> ToolCall {
        let email_type = self.detect_type(body_text);
        let priority = self.detect_priority(body_text, email_type);
        debug!(email_type, priority, "Rule-based classification");

        let mut arguments = Map::new();
        arguments.insert("email_type".into(), Value::String(email_type.into()));
        arguments.insert("priority".into(), Value::String(priority.into()));
        arguments.insert(
            "category".into(),
            Value::String(format!("{RULE_BASED_MARKER}: {email_type}")),
        );
        ToolCall::new(CLASSIFY_EMAIL, arguments)
    }

    /// First matching type rule wins; unmatched bodies are `general`.
    fn detect_type(&self, body_text: &str) -> &'static str {
        self.type_rules
            .iter()
            .find(|rule| rule.keywords.is_match(body_text))
            .map(|rule| rule.email_type)
            .unwrap_or("general")
    }

    /// Priority ladder, highest rung that applies:
    /// urgent keyword → urgent; complaint or urgent-adjacent term → high;
    /// short body → low; otherwise medium.
    fn detect_priority(&self, body_text: &str, email_type: &str) -> &'static str {
        if self.urgent.is_match(body_text) {
            "urgent"
        } else if email_type == "complaint" || self.urgent_adjacent.is_match(body_text) {
            "high"
        } else if body_text.chars().count() < SHORT_BODY_CHARS {
            "low"
        } else {
            "medium"
        }
    }
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self::new()
    }
}
