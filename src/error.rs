//! Error types for the email intelligence gateway.

use std::time::Duration;

/// Top-level error type for the gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// A single model-invocation attempt failure.
///
/// Every kind except `AccessDenied` is transient: the invoker retries it
/// within the tier until the retry budget is spent, then falls through to
/// the next tier. `AccessDenied` abandons the tier immediately — retrying
/// a permission failure cannot succeed.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model {model} not ready: {reason}")]
    ServiceNotReady { model: String, reason: String },

    #[error("Model {model} rate limited, retry after {retry_after:?}")]
    RateLimited {
        model: String,
        retry_after: Option<Duration>,
    },

    #[error("Model {model} attempt timed out after {timeout:?}")]
    Timeout { model: String, timeout: Duration },

    #[error("Access denied to model {model}")]
    AccessDenied { model: String },

    #[error("Network failure invoking model {model}: {reason}")]
    Network { model: String, reason: String },
}

impl ModelError {
    /// Whether the invoker may retry this attempt within the same tier.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::AccessDenied { .. })
    }

    /// Short kind label for logging and audit fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceNotReady { .. } => "service_not_ready",
            Self::RateLimited { .. } => "rate_limited",
            Self::Timeout { .. } => "timeout",
            Self::AccessDenied { .. } => "access_denied",
            Self::Network { .. } => "network_failure",
        }
    }
}

/// Tool handler execution errors.
///
/// These are distinct from argument-validation failures, which are data
/// (`ValidationResult`), not errors. A handler error means the arguments
/// passed schema validation but the handler itself could not act on them.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("No handler registered for tool {name}")]
    NotFound { name: String },

    #[error("Tool {name} execution failed: {reason}")]
    ExecutionFailed { name: String, reason: String },

    #[error("Invalid arguments for tool {name}: {reason}")]
    InvalidArguments { name: String, reason: String },
}

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, Error>;
