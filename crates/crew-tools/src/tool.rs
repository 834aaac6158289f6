//! Tool trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait for tools that agents can invoke
///
/// A tool takes a single string (typically a ticker such as `AAPL`, or a
/// URL) and answers with a single string for the model to read. Tools must
/// be stateless so that retries and concurrent runs are safe. Failures are
/// reported as [`ToolError`](crate::ToolError) or as a readable "no data"
/// string, never as a panic.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name, matched exactly when the model requests the tool
    fn name(&self) -> &str;

    /// What the tool does and what input it expects
    ///
    /// Shown verbatim to the model.
    fn usage_doc(&self) -> &str;

    /// Invoke the tool with its single string argument
    async fn invoke(&self, input: &str) -> Result<String>;
}
