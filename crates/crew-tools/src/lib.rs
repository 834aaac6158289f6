//! Tool management and execution framework for stock-crew
//!
//! Tools are named, documented callables taking one string and returning one
//! string. Agents reach them only through exact-name lookup in a
//! [`ToolRegistry`].

pub mod error;
pub mod registry;
pub mod timeout;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use timeout::Timed;
pub use tool::Tool;
