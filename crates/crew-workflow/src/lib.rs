//! Crew orchestration for stock-crew
//!
//! This crate provides:
//! - [`resolve`]: dependency ordering of tasks with cycle detection
//! - [`Crew`] / [`CrewBuilder`]: validated crews that run every task in order
//! - [`write_output`]: overwrite-on-each-run output files

pub mod crew;
pub mod dependency;
pub mod sink;

pub use crew::{Crew, CrewBuilder};
pub use dependency::resolve;
pub use sink::write_output;
