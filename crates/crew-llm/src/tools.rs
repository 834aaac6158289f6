//! Tool definition types for native LLM tool use

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name of the single argument every crew tool accepts
pub const INPUT_FIELD: &str = "input";

/// Tool definition sent to the LLM provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the tool in ToolRegistry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Definition for a tool taking one string argument named `input`
    pub fn string_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "The single string argument for this tool",
                    }
                },
                "required": ["input"],
            }),
        )
    }
}

/// Reduce a native tool-call payload to the single string argument
///
/// Accepts a bare string, `{"input": "..."}`, any object with exactly one
/// string field, or falls back to the JSON text itself.
pub fn input_as_string(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get(INPUT_FIELD) {
                return s.clone();
            }
            let mut strings = map.values().filter_map(Value::as_str);
            match (strings.next(), strings.next(), map.len()) {
                (Some(only), None, 1) => only.to_string(),
                _ => input.to_string(),
            }
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
