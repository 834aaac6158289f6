//! Per-invocation timeout wrapper

use crate::{Result, Tool, ToolError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Wraps a tool so that a hung invocation fails with [`ToolError::Timeout`]
///
/// ```
/// # use crew_tools::{Timed, Tool};
/// # use std::{sync::Arc, time::Duration};
/// # fn wrap(tool: Arc<dyn Tool>) -> Arc<dyn Tool> {
/// Arc::new(Timed::new(tool, Duration::from_secs(30)))
/// # }
/// ```
pub struct Timed {
    inner: Arc<dyn Tool>,
    limit: Duration,
}

impl Timed {
    pub fn new(inner: Arc<dyn Tool>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

#[async_trait]
impl Tool for Timed {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn usage_doc(&self) -> &str {
        self.inner.usage_doc()
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        match tokio::time::timeout(self.limit, self.inner.invoke(input)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(tool_name = %self.name(), limit_ms = self.limit.as_millis() as u64, "Tool timed out");
                Err(ToolError::Timeout {
                    tool: self.name().to_string(),
                    after: self.limit,
                })
            }
        }
    }
}
