//! Crew definition and execution

use crate::dependency::resolve;
use crate::sink::write_output;
use crew_core::{Agent, CrewError, CrewOutput, Result, RunInputs, Task, TaskOutput};
use crew_llm::ModelClient;
use crew_runtime::{AgentExecutor, Coworker, ExecutorConfig, Toolset, delegation_tools, task_prompt};
use crew_tools::ToolRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, instrument, warn};

/// A validated set of tasks, their agents and the tools those agents may use
///
/// Building a crew resolves the task order and every agent's toolset once, so
/// configuration defects surface before any model call. A built crew is
/// immutable and can serve concurrent runs behind an `Arc`; all run state
/// lives inside [`Crew::kickoff`].
///
/// # Example
///
/// ```no_run
/// use crew_core::{Agent, RunInputs, Task};
/// use crew_llm::ModelClient;
/// use crew_workflow::Crew;
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<ModelClient>) -> crew_core::Result<()> {
/// let researcher = Arc::new(Agent::builder("Researcher").goal("Find news").build()?);
/// let crew = Crew::builder(client)
///     .task(
///         Task::builder("research")
///             .description("Summarise recent news about {company}")
///             .agent(researcher)
///             .build()?,
///     )
///     .build()?;
///
/// let report = crew.run(&RunInputs::new().with("company", "AAPL")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Crew {
    /// Tasks in execution order
    tasks: Vec<Task>,
    /// Toolset per agent role
    toolsets: HashMap<String, Toolset>,
    executor: Arc<AgentExecutor>,
}

impl Crew {
    pub fn builder(client: Arc<ModelClient>) -> CrewBuilder {
        CrewBuilder::new(client)
    }

    /// Tasks in the order they run
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Toolset resolved for the agent with `role`
    pub fn toolset(&self, role: &str) -> Option<&Toolset> {
        self.toolsets.get(role)
    }

    /// Run every task once and return all of their outputs
    ///
    /// Tasks run one after another. A task sees only the results of the tasks
    /// it names as context. Output files are written as soon as their task
    /// finishes. The first error aborts the run.
    #[instrument(skip(self, inputs), fields(tasks = self.tasks.len()))]
    pub async fn kickoff(&self, inputs: &RunInputs) -> Result<CrewOutput> {
        let start_time = Instant::now();
        let mut completed: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let span = info_span!("task", task = %task.name(), agent = %task.agent().role());
            let output = self.run_task(task, inputs, &completed).instrument(span).await?;

            if let Some(path) = task.output_file() {
                write_output(path, &output.raw).await?;
            }
            completed.push(output);
        }

        let output = CrewOutput::new(completed)
            .ok_or_else(|| CrewError::InvalidTask("crew has no tasks".to_string()))?;
        info!(
            duration_ms = start_time.elapsed().as_millis() as u64,
            degraded = output.is_degraded(),
            "Crew run finished"
        );
        Ok(output)
    }

    /// Run the crew and return the last task's result text
    pub async fn run(&self, inputs: &RunInputs) -> Result<String> {
        Ok(self.kickoff(inputs).await?.into_raw())
    }

    async fn run_task(
        &self,
        task: &Task,
        inputs: &RunInputs,
        completed: &[TaskOutput],
    ) -> Result<TaskOutput> {
        let agent = task.agent();
        let toolset = self
            .toolsets
            .get(agent.role())
            .ok_or_else(|| CrewError::InvalidAgent(format!("no toolset for '{}'", agent.role())))?;

        let context: Vec<(&str, &str)> = task
            .context()
            .iter()
            .filter_map(|dep| completed.iter().find(|out| &out.task == dep))
            .map(|out| (out.task.as_str(), out.raw.as_str()))
            .collect();

        let prompt = task_prompt(
            task,
            toolset,
            inputs,
            &context,
            self.executor.config().tool_protocol,
        )?;

        info!(context_tasks = context.len(), tools = toolset.len(), "Task started");
        let start_time = Instant::now();
        let outcome = self.executor.run(agent, toolset, prompt).await?;

        let output = TaskOutput {
            task: task.name().to_string(),
            agent: agent.role().to_string(),
            raw: outcome.raw,
            status: outcome.status,
            iterations: outcome.iterations,
        };
        if output.is_degraded() {
            warn!(iterations = output.iterations, "Task finished without a final answer");
        } else {
            info!(
                iterations = output.iterations,
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Task completed"
            );
        }
        Ok(output)
    }
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("tasks", &self.tasks.iter().map(Task::name).collect::<Vec<_>>())
            .field("toolsets", &self.toolsets)
            .finish()
    }
}

/// Builder for [`Crew`]
pub struct CrewBuilder {
    client: Arc<ModelClient>,
    tasks: Vec<Task>,
    agents: Vec<Arc<Agent>>,
    tools: Arc<ToolRegistry>,
    executor_config: ExecutorConfig,
}

impl CrewBuilder {
    pub fn new(client: Arc<ModelClient>) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            agents: Vec::new(),
            tools: Arc::new(ToolRegistry::new()),
            executor_config: ExecutorConfig::default(),
        }
    }

    /// Add a task; declaration order breaks ties between independent tasks
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Add an agent that owns no task but can take delegated work
    pub fn agent(mut self, agent: Arc<Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Registry the agents' tool names are resolved against
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn executor_config(mut self, config: ExecutorConfig) -> Self {
        self.executor_config = config;
        self
    }

    /// Validate the configuration and resolve the task order
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(CrewError::InvalidTask(
                "a crew needs at least one task".to_string(),
            ));
        }

        let order = resolve(&self.tasks)?;

        let mut agents: Vec<Arc<Agent>> = Vec::new();
        for agent in self
            .tasks
            .iter()
            .map(|t| t.agent())
            .chain(self.agents.iter())
        {
            match agents.iter().find(|a| a.role() == agent.role()) {
                Some(existing) if Arc::ptr_eq(existing, agent) => {}
                Some(_) => {
                    return Err(CrewError::InvalidAgent(format!(
                        "two different agents share the role '{}'",
                        agent.role()
                    )));
                }
                None => agents.push(Arc::clone(agent)),
            }
        }

        let mut base: Vec<Toolset> = Vec::with_capacity(agents.len());
        for agent in &agents {
            let toolset = Toolset::resolve(&self.tools, agent.tools().iter().map(String::as_str))
                .map_err(|tool| CrewError::UnknownTool {
                    agent: agent.role().to_string(),
                    tool,
                })?;
            base.push(toolset);
        }

        let executor = Arc::new(AgentExecutor::with_config(
            self.client,
            self.executor_config,
        ));

        let mut toolsets = HashMap::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            let mut toolset = base[i].clone();
            if agent.allow_delegation() && agents.len() > 1 {
                let coworkers = agents
                    .iter()
                    .zip(&base)
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, (agent, toolset))| Coworker {
                        agent: Arc::clone(agent),
                        toolset: toolset.clone(),
                    })
                    .collect();
                let (delegate, ask) = delegation_tools(Arc::clone(&executor), coworkers);
                toolset.push(Arc::new(delegate));
                toolset.push(Arc::new(ask));
            }
            toolsets.insert(agent.role().to_string(), toolset);
        }

        let mut slots: Vec<Option<Task>> = self.tasks.into_iter().map(Some).collect();
        let tasks = order.into_iter().filter_map(|i| slots[i].take()).collect();

        Ok(Crew {
            tasks,
            toolsets,
            executor,
        })
    }
}
