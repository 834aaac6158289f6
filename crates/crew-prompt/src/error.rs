//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while rendering a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// The template references a placeholder that has no value
    #[error("missing value for placeholder '{{{name}}}'")]
    MissingPlaceholder {
        /// Placeholder name without braces
        name: String,
    },
}
