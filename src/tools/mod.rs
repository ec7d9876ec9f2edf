//! Tool schemas, validation, and routing.

pub mod builtin;
pub mod router;
pub mod schema;
pub mod validate;

pub use router::{RouteOutcome, ToolRouter};
pub use schema::{SchemaRegistry, ToolDefinition};
pub use validate::{ArgumentValidator, FieldError, ValidationResult};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HandlerError;

/// A structured, named request to perform one of the supported actions.
///
/// Produced by the response normalizer or the rule-based classifier;
/// immutable once produced. The name stays a plain string so that calls
/// naming unknown tools flow into validation instead of failing upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name, e.g. `classify_email`.
    pub name: String,
    /// Argument name → value mapping.
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One tool-execution capability, bound to a tool name.
///
/// Handlers run only after the router has validated the call's arguments
/// against the schema registry. Semantic checks the schema cannot express
/// (date formats, for instance) stay in the handler.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name this handler serves.
    fn name(&self) -> &str;

    /// Execute the tool with schema-validated arguments.
    async fn handle(&self, arguments: &Map<String, Value>) -> Result<Value, HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_call_round_trips_through_serde() {
        let mut arguments = Map::new();
        arguments.insert("email_type".into(), json!("inquiry"));
        arguments.insert("priority".into(), json!("low"));
        let call = ToolCall::new("classify_email", arguments);

        let encoded = serde_json::to_string(&call).unwrap();
        let decoded: ToolCall = serde_json::from_str(&encoded).unwrap();
        assert_eq!(call, decoded);
    }
}
