//! Run results

use serde::{Deserialize, Serialize};

/// How a task's reasoning loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The model produced a final answer
    Completed,
    /// The iteration budget ran out; the result is the best partial answer
    Exhausted,
}

/// Result of one task within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Role of the agent that produced it
    pub agent: String,
    /// Result text handed to downstream tasks
    pub raw: String,
    /// Completion state
    pub status: TaskStatus,
    /// Reasoning turns used
    pub iterations: usize,
}

impl TaskOutput {
    /// Whether the result came from an exhausted loop
    pub fn is_degraded(&self) -> bool {
        self.status == TaskStatus::Exhausted
    }
}

/// Result of a complete crew run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewOutput {
    tasks: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Wrap task outputs in execution order
    ///
    /// Returns `None` for an empty list since a run always has a final task.
    pub fn new(tasks: Vec<TaskOutput>) -> Option<Self> {
        if tasks.is_empty() {
            None
        } else {
            Some(Self { tasks })
        }
    }

    /// Output of the last executed task
    pub fn final_output(&self) -> &TaskOutput {
        // `new` guarantees at least one entry
        &self.tasks[self.tasks.len() - 1]
    }

    /// Result text of the last executed task
    pub fn raw(&self) -> &str {
        &self.final_output().raw
    }

    /// All task outputs in execution order
    pub fn tasks(&self) -> &[TaskOutput] {
        &self.tasks
    }

    /// Look up a task's output by name
    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|t| t.task == name)
    }

    /// Whether any task ended exhausted
    pub fn is_degraded(&self) -> bool {
        self.tasks.iter().any(TaskOutput::is_degraded)
    }

    /// Consume the output and return the final text
    pub fn into_raw(mut self) -> String {
        self.tasks.pop().map(|t| t.raw).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(task: &str, status: TaskStatus) -> TaskOutput {
        TaskOutput {
            task: task.to_string(),
            agent: "Analyst".to_string(),
            raw: format!("{task} result"),
            status,
            iterations: 1,
        }
    }

    #[test]
    fn test_final_output_is_last() {
        let out = CrewOutput::new(vec![
            output("research", TaskStatus::Completed),
            output("recommendation", TaskStatus::Completed),
        ])
        .unwrap();

        assert_eq!(out.raw(), "recommendation result");
        assert_eq!(out.task("research").unwrap().raw, "research result");
        assert!(!out.is_degraded());
        assert_eq!(out.into_raw(), "recommendation result");
    }

    #[test]
    fn test_degraded_flag() {
        let out = CrewOutput::new(vec![
            output("research", TaskStatus::Exhausted),
            output("recommendation", TaskStatus::Completed),
        ])
        .unwrap();
        assert!(out.is_degraded());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(CrewOutput::new(Vec::new()).is_none());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&TaskStatus::Exhausted).unwrap();
        assert_eq!(json, r#""exhausted""#);
    }
}
