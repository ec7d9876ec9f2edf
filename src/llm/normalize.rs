//! Response normalization — one canonical tool-call shape out of several
//! possible wire shapes.
//!
//! The model service is known to emit tool invocations in at least two
//! forms: a nested `{"tool_use": {...}}` object, and a flat block carrying
//! `"type": "tool_use"`. Callers never branch on which form arrived. Any
//! further undocumented shape degrades to "no tool calls" with the text
//! content preserved — a malformed block must never fail the request.

use serde_json::Value;
use tracing::warn;

use crate::tools::ToolCall;

/// One content block from a raw model response, discriminated by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// A tool invocation, from either known wire shape.
    ToolUse(ToolCall),
    /// Free-text content.
    Text(String),
    /// Anything unrecognized — carried so callers can count/skip it.
    Unknown,
}

impl ContentBlock {
    /// Detect which shape a raw content block is.
    ///
    /// Shape detection order: nested `tool_use` object first (the original
    /// wire format), then the flat `type` discriminator, then plain text.
    pub fn detect(raw: &Value) -> Self {
        if let Some(inner) = raw.get("tool_use") {
            return Self::from_tool_use_fields(inner.get("name"), inner.get("input"));
        }

        if raw.get("type").and_then(Value::as_str) == Some("tool_use") {
            return Self::from_tool_use_fields(raw.get("name"), raw.get("input"));
        }

        if let Some(text) = raw.get("text").and_then(Value::as_str) {
            return Self::Text(text.to_string());
        }

        Self::Unknown
    }

    /// Build a `ToolUse` block, or `Unknown` if the invocation is malformed
    /// (no name, or input that is not an object).
    fn from_tool_use_fields(name: Option<&Value>, input: Option<&Value>) -> Self {
        let Some(name) = name.and_then(Value::as_str) else {
            warn!("Skipping tool-use block with missing or non-string name");
            return Self::Unknown;
        };
        let Some(input) = input.and_then(Value::as_object) else {
            warn!(tool = %name, "Skipping tool-use block whose input is not an object");
            return Self::Unknown;
        };
        Self::ToolUse(ToolCall {
            name: name.to_string(),
            arguments: input.clone(),
        })
    }
}

/// Canonical form of a raw model response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResponse {
    /// Extracted tool invocations, in response order.
    pub tool_calls: Vec<ToolCall>,
    /// Free-text content, if any. Multiple text blocks join with newlines.
    pub raw_text: Option<String>,
}

impl NormalizedResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Normalize a raw model response into tool calls plus free text.
///
/// A response without a `content` array, or with only unrecognized blocks,
/// normalizes to empty tool calls — never an error.
pub fn normalize(raw: &Value) -> NormalizedResponse {
    let Some(content) = raw.get("content").and_then(Value::as_array) else {
        return NormalizedResponse::default();
    };

    let mut tool_calls = Vec::new();
    let mut text_parts: Vec<String> = Vec::new();

    for block in content {
        match ContentBlock::detect(block) {
            ContentBlock::ToolUse(call) => tool_calls.push(call),
            ContentBlock::Text(text) => text_parts.push(text),
            ContentBlock::Unknown => {}
        }
    }

    let raw_text = if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join("\n"))
    };

    NormalizedResponse {
        tool_calls,
        raw_text,
    }
}
