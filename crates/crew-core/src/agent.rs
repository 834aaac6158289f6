//! Agent definition
//!
//! An agent is a persona (role, goal, backstory) plus the names of the tools
//! it may call and how many reasoning turns it gets per task. Agents are
//! immutable once built and are shared between tasks and concurrent runs.

use crate::{CrewError, Result};
use serde::{Deserialize, Serialize};

/// Iteration budget used when none is configured
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// A configured actor that drives tasks to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<String>,
    max_iterations: usize,
    allow_delegation: bool,
}

impl Agent {
    /// Start building an agent with the given role
    pub fn builder(role: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(role)
    }

    /// Role, also the agent's identity within a crew
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Personal goal
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Free-text persona background
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// Names of tools this agent may invoke
    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    /// Whether `name` is one of this agent's tools
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t == name)
    }

    /// Maximum reasoning turns per task
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Whether the agent may hand work to coworkers
    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }
}

/// Builder for [`Agent`]
#[derive(Debug)]
pub struct AgentBuilder {
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<String>,
    max_iterations: usize,
    allow_delegation: bool,
}

impl AgentBuilder {
    /// Create a new builder
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            tools: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            allow_delegation: false,
        }
    }

    /// Set the goal
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Set the backstory
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Grant one tool by name
    pub fn tool(mut self, name: impl Into<String>) -> Self {
        self.tools.push(name.into());
        self
    }

    /// Grant several tools by name
    pub fn tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the iteration budget
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Allow or forbid delegation
    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Validate and build the agent
    pub fn build(self) -> Result<Agent> {
        let role = self.role.trim().to_string();
        if role.is_empty() {
            return Err(CrewError::InvalidAgent("role must not be empty".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(CrewError::InvalidAgent(format!(
                "agent '{role}' must allow at least one iteration"
            )));
        }

        let mut tools: Vec<String> = Vec::with_capacity(self.tools.len());
        for tool in self.tools {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }

        Ok(Agent {
            role,
            goal: self.goal,
            backstory: self.backstory,
            tools,
            max_iterations: self.max_iterations,
            allow_delegation: self.allow_delegation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let agent = Agent::builder("Researcher")
            .goal("Gather news")
            .backstory("Seasoned analyst")
            .build()
            .unwrap();

        assert_eq!(agent.role(), "Researcher");
        assert_eq!(agent.max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert!(!agent.allow_delegation());
        assert!(agent.tools().is_empty());
    }

    #[test]
    fn test_tools_deduplicated_in_order() {
        let agent = Agent::builder("Financial Analyst")
            .tool("Income statement")
            .tools(["Balance Sheet", "Income statement"])
            .build()
            .unwrap();

        assert_eq!(agent.tools(), ["Income statement", "Balance Sheet"]);
        assert!(agent.has_tool("Balance Sheet"));
        assert!(!agent.has_tool("Stock Price"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = Agent::builder("Analyst").max_iterations(0).build().unwrap_err();
        assert!(matches!(err, CrewError::InvalidAgent(_)));
    }

    #[test]
    fn test_blank_role_rejected() {
        let err = Agent::builder("   ").build().unwrap_err();
        assert!(matches!(err, CrewError::InvalidAgent(_)));
    }
}
