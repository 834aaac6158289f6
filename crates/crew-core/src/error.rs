//! Error types for crew configuration and execution

use crew_prompt::PromptError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crew operations
pub type Result<T> = std::result::Result<T, CrewError>;

/// Errors surfaced by building or running a crew
///
/// Tool failures and unauthorized tool requests never appear here: the
/// reasoning loop feeds them back to the model instead.
#[derive(Error, Debug)]
pub enum CrewError {
    /// Task dependencies form a cycle
    #[error("dependency cycle detected among tasks: {}", .tasks.join(" -> "))]
    Cycle {
        /// Tasks left unresolved, in declaration order
        tasks: Vec<String>,
    },

    /// A task names a dependency that is not part of the crew
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency {
        /// Task declaring the dependency
        task: String,
        /// Missing dependency name
        dependency: String,
    },

    /// Two tasks share the same name
    #[error("duplicate task name '{0}'")]
    DuplicateTask(String),

    /// An agent lists a tool that is not registered
    #[error("agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool {
        /// Agent role
        agent: String,
        /// Tool name as declared
        tool: String,
    },

    /// Agent configuration is invalid
    #[error("invalid agent configuration: {0}")]
    InvalidAgent(String),

    /// Task or crew configuration is invalid
    #[error("invalid task configuration: {0}")]
    InvalidTask(String),

    /// A task template references a placeholder absent from the run inputs
    #[error("task '{task}' cannot be rendered: {source}")]
    MissingPlaceholder {
        /// Task being rendered
        task: String,
        /// Underlying template error
        #[source]
        source: PromptError,
    },

    /// The model service could not be reached within the retry budget
    #[error("model service unavailable after {attempts} attempt(s): {reason}")]
    ModelUnavailable {
        /// Number of calls made before giving up
        attempts: u32,
        /// Last failure reported by the client
        reason: String,
    },

    /// Writing a task result to its output file failed
    #[error("failed to write output file '{}': {source}", .path.display())]
    OutputSink {
        /// Target path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl CrewError {
    /// Whether this error reflects a static configuration defect
    ///
    /// Configuration errors are detected when a crew is built and will fail
    /// every run identically.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Cycle { .. }
                | Self::UnknownDependency { .. }
                | Self::DuplicateTask(_)
                | Self::UnknownTool { .. }
                | Self::InvalidAgent(_)
                | Self::InvalidTask(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrewError::Cycle {
            tasks: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "dependency cycle detected among tasks: a -> b");

        let err = CrewError::UnknownDependency {
            task: "recommend".to_string(),
            dependency: "research".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "task 'recommend' depends on unknown task 'research'"
        );

        let err = CrewError::MissingPlaceholder {
            task: "research".to_string(),
            source: PromptError::MissingPlaceholder {
                name: "company".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "task 'research' cannot be rendered: missing value for placeholder '{company}'"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(CrewError::DuplicateTask("x".to_string()).is_configuration());
        assert!(
            !CrewError::ModelUnavailable {
                attempts: 3,
                reason: "timeout".to_string()
            }
            .is_configuration()
        );
    }
}
