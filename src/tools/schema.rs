//! Schema registry — the static constraint table for the supported tools.
//!
//! Built once at process start, never mutated, shared across concurrent
//! requests behind an `Arc` without locking. The typed field specs drive
//! argument validation; the same specs render the JSON tool definitions
//! sent to the model.

use serde::Serialize;
use serde_json::{Value, json};

pub const CLASSIFY_EMAIL: &str = "classify_email";
pub const GENERATE_DRAFT: &str = "generate_draft";
pub const SCHEDULE_MEETING: &str = "schedule_meeting";
pub const CREATE_TASK: &str = "create_task";

/// Declared type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    StringArray,
}

impl FieldType {
    /// JSON-schema type tag.
    pub fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::StringArray => "array",
        }
    }

    /// Human-readable name used in validation error reasons.
    pub fn expected(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::StringArray => "array of strings",
        }
    }
}

/// Constraint descriptor for one tool argument.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub description: &'static str,
    pub enum_values: Option<&'static [&'static str]>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl FieldSpec {
    fn new(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: true,
            description,
            enum_values: None,
            min_items: None,
            max_items: None,
            minimum: None,
            maximum: None,
        }
    }

    fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::String, description)
    }

    fn string_enum(
        name: &'static str,
        description: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self {
            enum_values: Some(values),
            ..Self::new(name, FieldType::String, description)
        }
    }

    fn integer(
        name: &'static str,
        description: &'static str,
        minimum: i64,
        maximum: i64,
    ) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
            ..Self::new(name, FieldType::Integer, description)
        }
    }

    fn string_array(name: &'static str, description: &'static str, min_items: usize) -> Self {
        Self {
            min_items: Some(min_items),
            ..Self::new(name, FieldType::StringArray, description)
        }
    }

    /// Render this field's JSON-schema property object.
    fn property(&self) -> Value {
        let mut prop = json!({
            "type": self.field_type.json_type(),
            "description": self.description,
        });
        if let Some(values) = self.enum_values {
            prop["enum"] = json!(values);
        }
        if self.field_type == FieldType::StringArray {
            prop["items"] = json!({"type": "string"});
        }
        if let Some(min) = self.min_items {
            prop["minItems"] = json!(min);
        }
        if let Some(max) = self.max_items {
            prop["maxItems"] = json!(max);
        }
        if let Some(min) = self.minimum {
            prop["minimum"] = json!(min);
        }
        if let Some(max) = self.maximum {
            prop["maximum"] = json!(max);
        }
        prop
    }
}

/// Schema entry for one supported tool. Field order is the declaration
/// order, which fixes the order validation errors are reported in.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ToolSchema {
    /// Look up a field spec by argument name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Tool definition in the wire shape the model service expects.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Process-wide, read-only table of tool schemas.
#[derive(Debug)]
pub struct SchemaRegistry {
    tools: Vec<ToolSchema>,
}

impl SchemaRegistry {
    /// The four supported tools.
    ///
    /// `email_type` carries `general` in addition to the model-facing
    /// values: the rule-based tier reports unmatched emails as `general`,
    /// and its output must always pass validation.
    pub fn builtin() -> Self {
        let tools = vec![
            ToolSchema {
                name: CLASSIFY_EMAIL,
                description: "Classify the email type and determine priority level",
                fields: vec![
                    FieldSpec::string_enum(
                        "email_type",
                        "The type of email received",
                        &[
                            "inquiry",
                            "complaint",
                            "meeting_request",
                            "task_assignment",
                            "spam",
                            "other",
                            "general",
                        ],
                    ),
                    FieldSpec::string_enum(
                        "priority",
                        "Priority level of the email",
                        &["low", "medium", "high", "urgent"],
                    ),
                    FieldSpec::string("category", "Brief category description"),
                ],
            },
            ToolSchema {
                name: GENERATE_DRAFT,
                description: "Generate a professional draft response to the email",
                fields: vec![
                    FieldSpec::string_enum(
                        "tone",
                        "Tone of the response",
                        &["formal", "friendly", "neutral", "apologetic"],
                    ),
                    FieldSpec::string("summary", "Brief summary of the email content"),
                    FieldSpec::string_enum(
                        "urgency",
                        "Urgency level for response",
                        &["low", "medium", "high"],
                    ),
                    FieldSpec::string_enum(
                        "response_type",
                        "Type of response needed",
                        &[
                            "acknowledgment",
                            "information_request",
                            "meeting_proposal",
                            "task_confirmation",
                        ],
                    ),
                ],
            },
            ToolSchema {
                name: SCHEDULE_MEETING,
                description: "Schedule a meeting based on email request",
                fields: vec![
                    FieldSpec::string("date", "Meeting date in YYYY-MM-DD format"),
                    FieldSpec::string("time", "Meeting time in HH:MM format"),
                    FieldSpec::integer("duration", "Meeting duration in minutes", 15, 480),
                    FieldSpec::string_array("attendees", "List of attendee email addresses", 1),
                    FieldSpec::string("meeting_title", "Title/subject of the meeting"),
                ],
            },
            ToolSchema {
                name: CREATE_TASK,
                description: "Create a follow-up task based on email content",
                fields: vec![
                    FieldSpec::string("title", "Task title"),
                    FieldSpec::string("description", "Detailed task description"),
                    FieldSpec::string("due_date", "Due date in YYYY-MM-DD format"),
                    FieldSpec::string_enum(
                        "priority",
                        "Task priority",
                        &["low", "medium", "high"],
                    ),
                    FieldSpec::string("assignee", "Email of person assigned to task"),
                ],
            },
        ];
        Self { tools }
    }

    /// Look up a tool schema by name.
    pub fn lookup(&self, tool_name: &str) -> Option<&ToolSchema> {
        self.tools.iter().find(|t| t.name == tool_name)
    }

    /// All registered tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    /// Render the tool definitions sent to the model service.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| {
                let properties: serde_json::Map<String, Value> = tool
                    .fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.property()))
                    .collect();
                let required: Vec<&str> = tool
                    .fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                ToolDefinition {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": properties,
                        "required": required,
                    }),
                }
            })
            .collect()
    }
}
