//! Task ordering

use crew_core::{CrewError, Result, Task};
use std::collections::{HashMap, HashSet};

/// Order `tasks` so every task comes after the tasks it depends on.
///
/// Among tasks that are ready at the same time the earliest declared goes
/// first, so an already valid declaration order is returned unchanged.
/// Returns indices into `tasks`.
pub fn resolve(tasks: &[Task]) -> Result<Vec<usize>> {
    let mut index = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if index.insert(task.name(), i).is_some() {
            return Err(CrewError::DuplicateTask(task.name().to_string()));
        }
    }

    for task in tasks {
        if let Some(missing) = task.context().iter().find(|dep| !index.contains_key(dep.as_str())) {
            return Err(CrewError::UnknownDependency {
                task: task.name().to_string(),
                dependency: missing.clone(),
            });
        }
    }

    let mut placed: HashSet<usize> = HashSet::with_capacity(tasks.len());
    let mut order = Vec::with_capacity(tasks.len());

    while order.len() < tasks.len() {
        let next = (0..tasks.len()).find(|i| {
            !placed.contains(i)
                && tasks[*i]
                    .context()
                    .iter()
                    .all(|dep| placed.contains(&index[dep.as_str()]))
        });

        match next {
            Some(i) => {
                placed.insert(i);
                order.push(i);
            }
            None => {
                let remaining = (0..tasks.len())
                    .filter(|i| !placed.contains(i))
                    .map(|i| tasks[i].name().to_string())
                    .collect();
                return Err(CrewError::Cycle { tasks: remaining });
            }
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::Agent;
    use std::sync::Arc;

    fn task(name: &str, deps: &[&str]) -> Task {
        let agent = Arc::new(Agent::builder("Researcher").build().unwrap());
        Task::builder(name)
            .description("do it")
            .agent(agent)
            .context(deps.iter().copied())
            .build()
            .unwrap()
    }

    fn names(tasks: &[Task], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| tasks[i].name().to_string()).collect()
    }

    #[test]
    fn test_declaration_order_kept_when_valid() {
        let tasks = vec![
            task("research", &[]),
            task("technical_analysis", &[]),
            task("financial_analysis", &[]),
            task(
                "investment_recommendation",
                &["research", "technical_analysis", "financial_analysis"],
            ),
        ];
        assert_eq!(resolve(&tasks).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dependencies_come_first() {
        let tasks = vec![
            task("report", &["b"]),
            task("a", &[]),
            task("b", &["a"]),
            task("c", &[]),
        ];
        let order = resolve(&tasks).unwrap();
        assert_eq!(names(&tasks, &order), vec!["a", "b", "report", "c"]);
    }

    #[test]
    fn test_cycle_names_remaining_tasks() {
        let tasks = vec![task("a", &["b"]), task("b", &["a"]), task("c", &[])];
        match resolve(&tasks).unwrap_err() {
            CrewError::Cycle { tasks } => assert_eq!(tasks, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let tasks = vec![task("a", &["a"])];
        assert!(matches!(resolve(&tasks), Err(CrewError::Cycle { .. })));
    }

    #[test]
    fn test_unknown_dependency() {
        let tasks = vec![task("report", &["research"])];
        match resolve(&tasks).unwrap_err() {
            CrewError::UnknownDependency { task, dependency } => {
                assert_eq!(task, "report");
                assert_eq!(dependency, "research");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_task_name() {
        let tasks = vec![task("a", &[]), task("a", &[])];
        assert!(matches!(resolve(&tasks), Err(CrewError::DuplicateTask(name)) if name == "a"));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(&[]).unwrap().is_empty());
    }
}
