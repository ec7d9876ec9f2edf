//! Email processing pipeline.

pub mod processor;
pub mod types;

pub use processor::Gateway;
pub use types::{EmailRequest, GatewayResult, RouteDisposition, RoutedToolCall};
