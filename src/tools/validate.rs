//! Argument validation — the gate every tool call passes before any
//! handler runs.
//!
//! All violations are collected; there is no short-circuiting. A caller
//! sees every problem with a call at once, in schema field order.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::tools::schema::{FieldSpec, FieldType, SchemaRegistry};

/// One validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of validating exactly one tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates tool-call arguments against the schema registry.
#[derive(Debug, Clone)]
pub struct ArgumentValidator {
    registry: Arc<SchemaRegistry>,
}

impl ArgumentValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Validate `arguments` for `tool_name`, collecting every violation.
    ///
    /// Check order: unknown tool; missing required fields; then for each
    /// present field its type, enum membership, array length bounds, and
    /// integer range. Arguments the schema does not declare are ignored.
    pub fn validate(&self, tool_name: &str, arguments: &Map<String, Value>) -> ValidationResult {
        let Some(schema) = self.registry.lookup(tool_name) else {
            return ValidationResult::from_errors(vec![FieldError::new(
                "tool_name",
                "unknown tool",
            )]);
        };

        let mut errors = Vec::new();

        for field in schema.fields.iter().filter(|f| f.required) {
            if is_missing(arguments.get(field.name)) {
                errors.push(FieldError::new(field.name, "missing required field"));
            }
        }

        for field in &schema.fields {
            let Some(value) = arguments.get(field.name) else {
                continue;
            };
            // Null / empty-string values were already reported as missing.
            if is_missing(Some(value)) {
                continue;
            }
            check_field(field, value, &mut errors);
        }

        ValidationResult::from_errors(errors)
    }
}

/// A required field counts as missing when absent, null, or empty string.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn check_field(field: &FieldSpec, value: &Value, errors: &mut Vec<FieldError>) {
    if !type_matches(field.field_type, value) {
        errors.push(FieldError::new(
            field.name,
            format!("type mismatch: expected {}", field.field_type.expected()),
        ));
        return;
    }

    if let Some(allowed) = field.enum_values
        && let Some(s) = value.as_str()
        && !allowed.contains(&s)
    {
        errors.push(FieldError::new(field.name, "invalid enum value"));
    }

    if let Some(items) = value.as_array() {
        let below = field.min_items.is_some_and(|min| items.len() < min);
        let above = field.max_items.is_some_and(|max| items.len() > max);
        if below || above {
            errors.push(FieldError::new(field.name, "array length out of bounds"));
        }
    }

    if let Some(n) = value.as_i64() {
        let below = field.minimum.is_some_and(|min| n < min);
        let above = field.maximum.is_some_and(|max| n > max);
        if below || above {
            errors.push(FieldError::new(field.name, "value out of range"));
        }
    }
}

fn type_matches(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String => value.is_string(),
        FieldType::Integer => value.is_i64(),
        FieldType::StringArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> ArgumentValidator {
        ArgumentValidator::new(Arc::new(SchemaRegistry::builtin()))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn unknown_tool_yields_single_error() {
        let result = validator().validate("launch_missiles", &Map::new());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "tool_name");
        assert_eq!(result.errors[0].reason, "unknown tool");
    }

    #[test]
    fn valid_classify_call_passes() {
        let result = validator().validate(
            "classify_email",
            &args(json!({
                "email_type": "inquiry",
                "priority": "medium",
                "category": "billing question"
            })),
        );
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn collects_all_violations_not_just_first() {
        // Two required fields missing, one present field with a wrong type:
        // exactly 3 errors.
        let result = validator().validate(
            "schedule_meeting",
            &args(json!({
                "date": "2026-03-02",
                "time": "14:00",
                "duration": "sixty"
            })),
        );
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(
            result.errors[0],
            FieldError::new("attendees", "missing required field")
        );
        assert_eq!(
            result.errors[1],
            FieldError::new("meeting_title", "missing required field")
        );
        assert_eq!(
            result.errors[2],
            FieldError::new("duration", "type mismatch: expected integer")
        );
    }

    #[test]
    fn enum_violation_rejected() {
        let result = validator().validate(
            "generate_draft",
            &args(json!({
                "tone": "sarcastic",
                "summary": "complaint about shipping",
                "urgency": "high",
                "response_type": "acknowledgment"
            })),
        );
        assert!(!result.valid);
        assert_eq!(result.errors, vec![FieldError::new("tone", "invalid enum value")]);
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let result = validator().validate(
            "classify_email",
            &args(json!({
                "email_type": "inquiry",
                "priority": "low",
                "category": ""
            })),
        );
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![FieldError::new("category", "missing required field")]
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let result = validator().validate(
            "classify_email",
            &args(json!({
                "email_type": "inquiry",
                "priority": null,
                "category": "x"
            })),
        );
        assert_eq!(
            result.errors,
            vec![FieldError::new("priority", "missing required field")]
        );
    }

    #[test]
    fn array_length_bounds_enforced() {
        let result = validator().validate(
            "schedule_meeting",
            &args(json!({
                "date": "2026-03-02",
                "time": "14:00",
                "duration": 30,
                "attendees": [],
                "meeting_title": "Standup"
            })),
        );
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![FieldError::new("attendees", "array length out of bounds")]
        );
    }

    #[test]
    fn array_of_non_strings_is_type_mismatch() {
        let result = validator().validate(
            "schedule_meeting",
            &args(json!({
                "date": "2026-03-02",
                "time": "14:00",
                "duration": 30,
                "attendees": [1, 2],
                "meeting_title": "Standup"
            })),
        );
        assert_eq!(
            result.errors,
            vec![FieldError::new(
                "attendees",
                "type mismatch: expected array of strings"
            )]
        );
    }

    #[test]
    fn integer_range_enforced() {
        let validator = validator();
        for (duration, ok) in [(14, false), (15, true), (480, true), (481, false)] {
            let result = validator.validate(
                "schedule_meeting",
                &args(json!({
                    "date": "2026-03-02",
                    "time": "14:00",
                    "duration": duration,
                    "attendees": ["alice@example.com"],
                    "meeting_title": "Planning"
                })),
            );
            assert_eq!(result.valid, ok, "duration {duration}");
            if !ok {
                assert_eq!(
                    result.errors,
                    vec![FieldError::new("duration", "value out of range")]
                );
            }
        }
    }

    #[test]
    fn float_is_not_an_integer() {
        let result = validator().validate(
            "schedule_meeting",
            &args(json!({
                "date": "2026-03-02",
                "time": "14:00",
                "duration": 30.5,
                "attendees": ["alice@example.com"],
                "meeting_title": "Planning"
            })),
        );
        assert_eq!(
            result.errors,
            vec![FieldError::new("duration", "type mismatch: expected integer")]
        );
    }

    #[test]
    fn undeclared_arguments_are_ignored() {
        let result = validator().validate(
            "classify_email",
            &args(json!({
                "email_type": "spam",
                "priority": "low",
                "category": "promo blast",
                "extra_field": 42
            })),
        );
        assert!(result.valid);
    }

    #[test]
    fn create_task_priority_enum_excludes_urgent() {
        // create_task priority is the three-value enum, unlike classify_email.
        let result = validator().validate(
            "create_task",
            &args(json!({
                "title": "Follow up",
                "description": "Reply to the vendor",
                "due_date": "2026-04-01",
                "priority": "urgent",
                "assignee": "bob@example.com"
            })),
        );
        assert_eq!(
            result.errors,
            vec![FieldError::new("priority", "invalid enum value")]
        );
    }
}
