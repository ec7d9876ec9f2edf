//! Classification passthrough handler.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::error::HandlerError;
use crate::tools::ToolHandler;
use crate::tools::builtin::require_str;
use crate::tools::schema::CLASSIFY_EMAIL;

/// Confidence reported for schema-validated classifications.
const CLASSIFICATION_CONFIDENCE: f64 = 0.95;

/// Records the model's (or rule-based tier's) classification verdict.
pub struct ClassifyEmailHandler;

#[async_trait]
impl ToolHandler for ClassifyEmailHandler {
    fn name(&self) -> &str {
        CLASSIFY_EMAIL
    }

    async fn handle(&self, arguments: &Map<String, Value>) -> Result<Value, HandlerError> {
        let email_type = require_str(arguments, CLASSIFY_EMAIL, "email_type")?;
        let priority = require_str(arguments, CLASSIFY_EMAIL, "priority")?;
        let category = require_str(arguments, CLASSIFY_EMAIL, "category")?;

        info!(email_type, priority, "Email classified");

        Ok(json!({
            "status": "success",
            "classification": {
                "email_type": email_type,
                "priority": priority,
                "category": category,
                "confidence": CLASSIFICATION_CONFIDENCE,
                "timestamp": Utc::now().to_rfc3339(),
            }
        }))
    }
}
