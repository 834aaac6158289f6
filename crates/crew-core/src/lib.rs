//! Core data model for stock-crew
//!
//! This crate defines the immutable building blocks of a crew:
//!
//! - [`Agent`]: a persona with a bounded tool set and iteration budget
//! - [`Task`]: a templated unit of work bound to one agent
//! - [`RunInputs`]: placeholder values for a single run
//! - [`TaskOutput`] / [`CrewOutput`]: what a run produces
//! - [`CrewError`]: every failure a crew can surface to its caller

pub mod agent;
pub mod error;
pub mod inputs;
pub mod output;
pub mod task;

pub use agent::{Agent, AgentBuilder, DEFAULT_MAX_ITERATIONS};
pub use error::{CrewError, Result};
pub use inputs::RunInputs;
pub use output::{CrewOutput, TaskOutput, TaskStatus};
pub use task::{Task, TaskBuilder};
