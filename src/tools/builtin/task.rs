//! Follow-up task structuring handler.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::error::HandlerError;
use crate::tools::ToolHandler;
use crate::tools::builtin::require_str;
use crate::tools::schema::CREATE_TASK;

/// Structures a validated follow-up request into a task record.
pub struct CreateTaskHandler;

#[async_trait]
impl ToolHandler for CreateTaskHandler {
    fn name(&self) -> &str {
        CREATE_TASK
    }

    async fn handle(&self, arguments: &Map<String, Value>) -> Result<Value, HandlerError> {
        let title = require_str(arguments, CREATE_TASK, "title")?;
        let description = require_str(arguments, CREATE_TASK, "description")?;
        let due_date = require_str(arguments, CREATE_TASK, "due_date")?;
        let priority = require_str(arguments, CREATE_TASK, "priority")?;
        let assignee = require_str(arguments, CREATE_TASK, "assignee")?;

        NaiveDate::parse_from_str(due_date, "%Y-%m-%d").map_err(|_| {
            HandlerError::InvalidArguments {
                name: CREATE_TASK.to_string(),
                reason: "due_date must be in YYYY-MM-DD format".to_string(),
            }
        })?;

        let now = Utc::now();
        let task_id = format!("task_{}", now.format("%Y%m%d_%H%M%S"));
        info!(%task_id, due_date, priority, "Task created");

        Ok(json!({
            "status": "success",
            "task": {
                "title": title,
                "description": description,
                "due_date": due_date,
                "priority": priority,
                "assignee": assignee,
                "task_id": task_id,
                "status": "pending",
                "timestamp": now.to_rfc3339(),
            }
        }))
    }
}
