//! The tools one agent may call during a task

use crew_llm::ToolDefinition;
use crew_tools::{Tool, ToolError, ToolRegistry};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// An ordered, exact-name set of tools resolved for a single agent
#[derive(Clone, Default)]
pub struct Toolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `names` against `registry`, returning the first missing name on failure
    pub fn resolve<'a, I>(registry: &ToolRegistry, names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut toolset = Self::new();
        for name in names {
            let tool = registry.get(name).ok_or_else(|| name.to_string())?;
            toolset.push(tool);
        }
        Ok(toolset)
    }

    /// Add a tool; a tool with the same name replaces the earlier one
    pub fn push(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function-calling definitions for providers with native tool use
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::string_input(t.name(), t.usage_doc()))
            .collect()
    }

    /// Invoke a tool by name.
    ///
    /// Names outside the set yield [`ToolError::Unauthorized`]. The call runs on
    /// its own task so a panicking tool surfaces as [`ToolError::Failed`].
    pub async fn invoke(&self, name: &str, input: &str) -> crew_tools::Result<String> {
        let tool = self.get(name).cloned().ok_or_else(|| ToolError::Unauthorized {
            tool: name.to_string(),
            available: self.names(),
        })?;

        let input = input.to_string();
        match tokio::spawn(async move { tool.invoke(&input).await }).await {
            Ok(result) => result,
            Err(join_error) => {
                error!(tool_name = %name, error = %join_error, "Tool task aborted");
                Err(ToolError::failed(format!("tool '{name}' crashed")))
            }
        }
    }
}

impl fmt::Debug for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolset").field("tools", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "Echo"
        }
        fn usage_doc(&self) -> &str {
            "Repeats the input"
        }
        async fn invoke(&self, input: &str) -> crew_tools::Result<String> {
            Ok(input.to_string())
        }
    }

    struct Panics;

    #[async_trait]
    impl Tool for Panics {
        fn name(&self) -> &str {
            "Panics"
        }
        fn usage_doc(&self) -> &str {
            "Always panics"
        }
        async fn invoke(&self, _input: &str) -> crew_tools::Result<String> {
            panic!("boom")
        }
    }

    fn toolset() -> Toolset {
        let registry = ToolRegistry::new()
            .with(Arc::new(Echo))
            .with(Arc::new(Panics));
        Toolset::resolve(&registry, ["Echo", "Panics"]).unwrap()
    }

    #[test]
    fn test_resolve_reports_missing_name() {
        let registry = ToolRegistry::new().with(Arc::new(Echo));
        let err = Toolset::resolve(&registry, ["Echo", "Stock Price"]).unwrap_err();
        assert_eq!(err, "Stock Price");
    }

    #[test]
    fn test_definitions_use_usage_doc() {
        let defs = toolset().definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "Echo");
        assert_eq!(defs[0].description, "Repeats the input");
    }

    #[tokio::test]
    async fn test_invoke_known_tool() {
        assert_eq!(toolset().invoke("Echo", "AAPL").await.unwrap(), "AAPL");
    }

    #[tokio::test]
    async fn test_invoke_is_exact_name() {
        let err = toolset().invoke("echo", "AAPL").await.unwrap_err();
        match err {
            ToolError::Unauthorized { tool, available } => {
                assert_eq!(tool, "echo");
                assert_eq!(available, vec!["Echo", "Panics"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_tool_becomes_error() {
        let err = toolset().invoke("Panics", "").await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
    }
}
