//! Shared utilities for stock-crew
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and typed access to environment variables.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_or, env_parse, env_var};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
