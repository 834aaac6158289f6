//! Error types for tool invocation

use std::time::Duration;
use thiserror::Error;

/// Result type for tool invocation
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors a tool invocation can produce
///
/// These never abort a run; the reasoning loop renders them into the
/// conversation so the model can react.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The tool ran but its backing service failed
    #[error("{0}")]
    Failed(String),

    /// The input could not be understood by the tool
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tool did not answer in time
    #[error("tool '{tool}' timed out after {}s", .after.as_secs_f32())]
    Timeout {
        /// Tool name
        tool: String,
        /// Configured limit
        after: Duration,
    },

    /// The agent asked for a tool outside its tool set
    #[error(
        "you do not have access to this tool: '{tool}'. Tools available to you: {}",
        list_or_none(.available)
    )]
    Unauthorized {
        /// Requested tool name
        tool: String,
        /// Tools the agent may use
        available: Vec<String>,
    },
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

impl ToolError {
    /// Build a [`ToolError::Failed`] from anything displayable
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::Failed(message.to_string())
    }
}
