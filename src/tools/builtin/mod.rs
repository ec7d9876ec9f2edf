//! Built-in tool handlers.
//!
//! Default capabilities for the four supported tools. Callers embedding
//! the gateway may bind their own handlers instead; these implement the
//! stock behavior: classification passthrough, template-based drafting,
//! and meeting/task structuring.

mod classify;
mod draft;
mod meeting;
mod task;

pub use classify::ClassifyEmailHandler;
pub use draft::GenerateDraftHandler;
pub use meeting::ScheduleMeetingHandler;
pub use task::CreateTaskHandler;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::tools::ToolHandler;

/// All built-in handlers, one per supported tool.
pub fn all() -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ClassifyEmailHandler) as Arc<dyn ToolHandler>,
        Arc::new(GenerateDraftHandler),
        Arc::new(ScheduleMeetingHandler),
        Arc::new(CreateTaskHandler),
    ]
}

/// Extract a required string argument.
///
/// Handlers run after schema validation, but stay defensive: a missing
/// argument here is a handler error, not a panic.
pub(crate) fn require_str<'a>(
    arguments: &'a Map<String, Value>,
    tool: &str,
    name: &str,
) -> Result<&'a str, HandlerError> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidArguments {
            name: tool.to_string(),
            reason: format!("missing string argument '{name}'"),
        })
}

/// Extract a required integer argument.
pub(crate) fn require_i64(
    arguments: &Map<String, Value>,
    tool: &str,
    name: &str,
) -> Result<i64, HandlerError> {
    arguments
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| HandlerError::InvalidArguments {
            name: tool.to_string(),
            reason: format!("missing integer argument '{name}'"),
        })
}

/// Extract a required array-of-strings argument.
pub(crate) fn require_str_array(
    arguments: &Map<String, Value>,
    tool: &str,
    name: &str,
) -> Result<Vec<String>, HandlerError> {
    let items = arguments
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| HandlerError::InvalidArguments {
            name: tool.to_string(),
            reason: format!("missing array argument '{name}'"),
        })?;
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| HandlerError::InvalidArguments {
                    name: tool.to_string(),
                    reason: format!("argument '{name}' must contain only strings"),
                })
        })
        .collect()
}
