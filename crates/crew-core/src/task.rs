//! Task definition

use crate::{Agent, CrewError, Result};
use crew_prompt::Template;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A unit of pipeline work bound to one agent
///
/// `name` is the task's identity: dependencies refer to it and the upstream
/// context block labels results with it.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    description: Template,
    expected_output: Template,
    agent: Arc<Agent>,
    context: Vec<String>,
    output_file: Option<PathBuf>,
}

impl Task {
    /// Start building a task with the given name
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &Template {
        &self.description
    }

    pub fn expected_output(&self) -> &Template {
        &self.expected_output
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    /// Names of the tasks whose results this task reads, in prompt order
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// File that receives this task's result, overwritten on every run
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}

/// Builder for [`Task`]
#[derive(Debug)]
pub struct TaskBuilder {
    name: String,
    description: Option<Template>,
    expected_output: Option<Template>,
    agent: Option<Arc<Agent>>,
    context: Vec<String>,
    output_file: Option<PathBuf>,
}

impl TaskBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            expected_output: None,
            agent: None,
            context: Vec::new(),
            output_file: None,
        }
    }

    /// Set the description template
    pub fn description(mut self, template: impl Into<Template>) -> Self {
        self.description = Some(template.into());
        self
    }

    /// Set the expected-output template
    pub fn expected_output(mut self, template: impl Into<Template>) -> Self {
        self.expected_output = Some(template.into());
        self
    }

    /// Assign the agent
    pub fn agent(mut self, agent: Arc<Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Depend on another task by name
    pub fn depends_on(mut self, task: impl Into<String>) -> Self {
        self.context.push(task.into());
        self
    }

    /// Depend on several tasks by name
    pub fn context<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.extend(tasks.into_iter().map(Into::into));
        self
    }

    /// Persist the result to `path`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Validate and build the task
    pub fn build(self) -> Result<Task> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CrewError::InvalidTask("task name must not be empty".to_string()));
        }

        let description = self
            .description
            .ok_or_else(|| CrewError::InvalidTask(format!("task '{name}' has no description")))?;
        let agent = self
            .agent
            .ok_or_else(|| CrewError::InvalidTask(format!("task '{name}' has no agent")))?;

        let mut context: Vec<String> = Vec::with_capacity(self.context.len());
        for dependency in self.context {
            if !context.contains(&dependency) {
                context.push(dependency);
            }
        }

        Ok(Task {
            name,
            description,
            expected_output: self.expected_output.unwrap_or_else(|| Template::new("")),
            agent,
            context,
            output_file: self.output_file,
        })
    }
}
