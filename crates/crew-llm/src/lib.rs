//! LLM provider abstraction layer for stock-crew
//!
//! This crate provides provider-agnostic abstractions for talking to a
//! language model. It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Tool definitions for function calling
//! - The [`LLMProvider`] trait and an OpenAI-compatible implementation
//! - [`ModelClient`], which adds a per-call timeout and a bounded
//!   [`RetryPolicy`] on top of any provider

pub mod client;
pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod retry;
pub mod tools;

// Re-export main types
pub use client::{ModelClient, ModelSettings};
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use retry::RetryPolicy;
pub use tools::ToolDefinition;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
