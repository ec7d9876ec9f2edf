//! Meeting structuring handler.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::error::HandlerError;
use crate::tools::ToolHandler;
use crate::tools::builtin::{require_i64, require_str, require_str_array};
use crate::tools::schema::SCHEDULE_MEETING;

/// Structures a validated meeting request into a calendar-ready record.
///
/// Date and time formats are semantic constraints the schema cannot
/// express, so they are checked here rather than in the validator.
pub struct ScheduleMeetingHandler;

#[async_trait]
impl ToolHandler for ScheduleMeetingHandler {
    fn name(&self) -> &str {
        SCHEDULE_MEETING
    }

    async fn handle(&self, arguments: &Map<String, Value>) -> Result<Value, HandlerError> {
        let date = require_str(arguments, SCHEDULE_MEETING, "date")?;
        let time = require_str(arguments, SCHEDULE_MEETING, "time")?;
        let duration = require_i64(arguments, SCHEDULE_MEETING, "duration")?;
        let attendees = require_str_array(arguments, SCHEDULE_MEETING, "attendees")?;
        let title = require_str(arguments, SCHEDULE_MEETING, "meeting_title")?;

        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            HandlerError::InvalidArguments {
                name: SCHEDULE_MEETING.to_string(),
                reason: "date must be in YYYY-MM-DD format".to_string(),
            }
        })?;
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
            HandlerError::InvalidArguments {
                name: SCHEDULE_MEETING.to_string(),
                reason: "time must be in HH:MM format".to_string(),
            }
        })?;

        let now = Utc::now();
        let meeting_id = format!("meeting_{}", now.format("%Y%m%d_%H%M%S"));
        info!(%meeting_id, date, time, attendees = attendees.len(), "Meeting scheduled");

        Ok(json!({
            "status": "success",
            "meeting": {
                "title": title,
                "date": date,
                "time": time,
                "duration": duration,
                "attendees": attendees,
                "meeting_id": meeting_id,
                "timestamp": now.to_rfc3339(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arguments(date: &str, time: &str) -> Map<String, Value> {
        json!({
            "date": date,
            "time": time,
            "duration": 45,
            "attendees": ["alice@example.com", "bob@example.com"],
            "meeting_title": "Quarterly review"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[tokio::test]
    async fn schedules_valid_meeting() {
        let result = ScheduleMeetingHandler
            .handle(&arguments("2026-03-02", "14:30"))
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["meeting"]["duration"], 45);
        assert_eq!(result["meeting"]["attendees"].as_array().unwrap().len(), 2);
        assert!(
            result["meeting"]["meeting_id"]
                .as_str()
                .unwrap()
                .starts_with("meeting_")
        );
    }

    #[tokio::test]
    async fn rejects_bad_date_format() {
        let result = ScheduleMeetingHandler
            .handle(&arguments("03/02/2026", "14:30"))
            .await;
        match result {
            Err(HandlerError::InvalidArguments { reason, .. }) => {
                assert!(reason.contains("YYYY-MM-DD"));
            }
            other => panic!("Expected InvalidArguments, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejects_bad_time_format() {
        let result = ScheduleMeetingHandler
            .handle(&arguments("2026-03-02", "2pm"))
            .await;
        match result {
            Err(HandlerError::InvalidArguments { reason, .. }) => {
                assert!(reason.contains("HH:MM"));
            }
            other => panic!("Expected InvalidArguments, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejects_nonexistent_date() {
        let result = ScheduleMeetingHandler
            .handle(&arguments("2026-02-30", "10:00"))
            .await;
        assert!(matches!(result, Err(HandlerError::InvalidArguments { .. })));
    }
}
