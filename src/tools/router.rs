//! Tool router — validate, then dispatch.
//!
//! The router is stateless per call and safe to invoke concurrently for
//! independent tool calls. No handler executes until the call's arguments
//! pass the validator — no exceptions, no partial execution.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::HandlerError;
use crate::tools::validate::{ArgumentValidator, ValidationResult};
use crate::tools::{SchemaRegistry, ToolCall, ToolHandler};

/// Disposition of one routed tool call.
#[derive(Debug)]
pub enum RouteOutcome {
    /// Arguments were valid and the handler produced a result.
    Executed { result: Value },
    /// Arguments failed validation; the handler never ran.
    Rejected { validation: ValidationResult },
}

/// Routes validated tool calls to their handlers.
pub struct ToolRouter {
    validator: ArgumentValidator,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRouter {
    /// Create a router with no handlers bound.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            validator: ArgumentValidator::new(registry),
            handlers: HashMap::new(),
        }
    }

    /// Create a router with the built-in handlers for all four tools.
    pub fn with_builtin_handlers(registry: Arc<SchemaRegistry>) -> Self {
        let mut router = Self::new(registry);
        for handler in crate::tools::builtin::all() {
            router = router.with_handler(handler);
        }
        router
    }

    /// Bind a handler for its tool name. Last binding wins.
    pub fn with_handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.insert(handler.name().to_string(), handler);
        self
    }

    /// Validate and dispatch one tool call.
    ///
    /// Invalid arguments (including an unknown tool name) return
    /// `Rejected` — that is a per-call data outcome, not an error. A
    /// handler's own failure propagates as `Err`; the caller decides
    /// whether that aborts the request or is reported per call.
    pub async fn route(&self, call: &ToolCall) -> Result<RouteOutcome, HandlerError> {
        let validation = self.validator.validate(&call.name, &call.arguments);
        if !validation.valid {
            warn!(
                tool = %call.name,
                errors = validation.errors.len(),
                "Tool call rejected by validation"
            );
            return Ok(RouteOutcome::Rejected { validation });
        }

        let handler = self
            .handlers
            .get(&call.name)
            .ok_or_else(|| HandlerError::NotFound {
                name: call.name.clone(),
            })?;

        debug!(tool = %call.name, "Dispatching tool call");
        let result = handler.handle(&call.arguments).await?;
        Ok(RouteOutcome::Executed { result })
    }
}
