//! Agent runtime for stock-crew
//!
//! This crate turns a task and an agent into a bounded reasoning loop:
//! prompt assembly, reply parsing, tool dispatch through a [`Toolset`], and
//! the coworker delegation tools.

pub mod delegation;
pub mod executor;
pub mod parser;
pub mod prompt;
pub mod toolset;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use delegation::{ASK_QUESTION, AskQuestionTool, Coworker, DELEGATE_WORK, DelegateWorkTool, delegation_tools};
pub use executor::{AgentExecutor, AgentOutcome, ExecutorConfig};
pub use parser::{Decision, ToolRequest};
pub use prompt::{TaskPrompt, ToolProtocol, delegated_prompt, system_prompt, task_prompt};
pub use toolset::Toolset;
