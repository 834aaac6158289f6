//! Prompt assembly for a single agent turn
//!
//! A [`TaskPrompt`] is a pure function of the agent persona, its toolset, the
//! task templates, the run inputs and the outputs of the task's dependencies.
//! The same arguments always produce byte-identical text.

use crate::toolset::Toolset;
use crew_core::{Agent, CrewError, Result, RunInputs, Task};
use crew_prompt::{PromptBuilder, PromptError};

/// Stop sequence that keeps a text-protocol model from inventing observations
pub const OBSERVATION_STOP: &str = "\nObservation:";

/// How tools are offered to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolProtocol {
    /// Provider function calling; tools are sent as definitions
    #[default]
    Native,
    /// `Action:` / `Action Input:` text parsed from the reply
    Text,
}

/// System and user messages for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompt {
    pub system: String,
    pub user: String,
}

/// Persona framing plus the tool list and reply format
pub fn system_prompt(agent: &Agent, toolset: &Toolset, protocol: ToolProtocol) -> String {
    let mut builder = PromptBuilder::new()
        .line(format!("You are {}.", agent.role()))
        .when(!agent.backstory().is_empty(), format!("{}\n", agent.backstory()))
        .when(
            !agent.goal().is_empty(),
            format!("Your personal goal is: {}\n", agent.goal()),
        );

    if toolset.is_empty() {
        return builder
            .newline()
            .line("To give my best complete final answer to the task use the exact following format:")
            .newline()
            .line("Thought: I now can give a great answer")
            .line("Final Answer: Your final answer must be the great and the most complete as possible, it must be outcome described.")
            .newline()
            .text("I MUST use these formats, my job depends on it!")
            .build();
    }

    builder = builder
        .newline()
        .line("You ONLY have access to the following tools, and should NEVER make up tools that are not listed here:")
        .newline();
    for tool in toolset.iter() {
        builder = builder
            .field("Tool Name", tool.name())
            .field("Tool Description", tool.usage_doc())
            .newline();
    }

    let builder = match protocol {
        ToolProtocol::Native => builder
            .line("Call a tool whenever you need information it provides. Every tool takes a single string input.")
            .line("Once all necessary information is gathered, reply without calling a tool:")
            .newline()
            .line("Thought: I now know the final answer")
            .line("Final Answer: the final answer to the original input question"),
        ToolProtocol::Text => builder
            .line("Use the following format:")
            .newline()
            .line("Thought: you should always think about what to do")
            .line(format!(
                "Action: the action to take, only one name of [{}], just the name, exactly as it's written.",
                toolset.names().join(", ")
            ))
            .line("Action Input: the input to the action, just a simple string")
            .line("Observation: the result of the action")
            .newline()
            .line("Once all necessary information is gathered:")
            .newline()
            .line("Thought: I now know the final answer")
            .line("Final Answer: the final answer to the original input question"),
    };
    builder.build()
}

/// Render a task for its agent.
///
/// `context` holds `(task name, result)` pairs in the task's declared
/// dependency order.
pub fn task_prompt(
    task: &Task,
    toolset: &Toolset,
    inputs: &RunInputs,
    context: &[(&str, &str)],
    protocol: ToolProtocol,
) -> Result<TaskPrompt> {
    let render_error = |source: PromptError| CrewError::MissingPlaceholder {
        task: task.name().to_string(),
        source,
    };
    let description = task
        .description()
        .render(inputs.variables())
        .map_err(render_error)?;
    let expected_output = task
        .expected_output()
        .render(inputs.variables())
        .map_err(render_error)?;

    Ok(TaskPrompt {
        system: system_prompt(task.agent(), toolset, protocol),
        user: user_prompt(&description, &expected_output, context),
    })
}

/// Render work handed over by another agent; the text is used verbatim
pub fn delegated_prompt(
    coworker: &Agent,
    toolset: &Toolset,
    work: &str,
    context: &str,
    protocol: ToolProtocol,
) -> TaskPrompt {
    let user = if context.is_empty() {
        user_prompt(work, "", &[])
    } else {
        user_prompt(work, "", &[("Context from your coworker", context)])
    };

    TaskPrompt {
        system: system_prompt(coworker, toolset, protocol),
        user,
    }
}

fn user_prompt(description: &str, expected_output: &str, context: &[(&str, &str)]) -> String {
    let mut builder = PromptBuilder::new().line(format!("Current Task: {description}"));

    if !expected_output.is_empty() {
        builder = builder
            .newline()
            .line(format!(
                "This is the expect criteria for your final answer: {expected_output}"
            ))
            .line("you MUST return the actual complete content as the final answer, not a summary.");
    }

    if !context.is_empty() {
        builder = builder
            .newline()
            .line("This is the context you're working with:");
        for (name, result) in context {
            builder = builder.section(*name).line(*result);
        }
    }

    builder
        .newline()
        .text("Begin! This is VERY important to you, use the tools available and give your best Final Answer, your job depends on it!")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crew_tools::{Tool, ToolRegistry};
    use std::sync::Arc;

    struct News;

    #[async_trait]
    impl Tool for News {
        fn name(&self) -> &str {
            "Stock News"
        }
        fn usage_doc(&self) -> &str {
            "Useful to get news about a stock."
        }
        async fn invoke(&self, _input: &str) -> crew_tools::Result<String> {
            Ok(String::new())
        }
    }

    fn analyst() -> Arc<Agent> {
        Arc::new(
            Agent::builder("Hedge Fund Manager")
                .goal("Recommend an investment")
                .backstory("Seasoned manager.")
                .tool("Stock News")
                .build()
                .unwrap(),
        )
    }

    fn recommendation() -> Task {
        Task::builder("investment_recommendation")
            .description("Recommend {company}.")
            .expected_output("A {company} report with {{braces}}")
            .agent(analyst())
            .context(["research", "financial_analysis"])
            .build()
            .unwrap()
    }

    fn toolset() -> Toolset {
        let registry = ToolRegistry::new().with(Arc::new(News));
        Toolset::resolve(&registry, ["Stock News"]).unwrap()
    }

    #[test]
    fn test_task_prompt_renders_inputs_and_context_in_order() {
        let inputs = RunInputs::new().with("company", "AAPL");
        let prompt = task_prompt(
            &recommendation(),
            &toolset(),
            &inputs,
            &[("research", "R1"), ("financial_analysis", "F1")],
            ToolProtocol::Text,
        )
        .unwrap();

        assert!(prompt.user.starts_with("Current Task: Recommend AAPL.\n"));
        assert!(prompt.user.contains("final answer: A AAPL report with {braces}"));
        let research = prompt.user.find("## research\nR1").unwrap();
        let financial = prompt.user.find("## financial_analysis\nF1").unwrap();
        assert!(research < financial);

        assert!(prompt.system.starts_with("You are Hedge Fund Manager.\nSeasoned manager.\n"));
        assert!(prompt.system.contains("Your personal goal is: Recommend an investment"));
        assert!(prompt.system.contains("Tool Name: Stock News"));
        assert!(prompt.system.contains("only one name of [Stock News]"));
    }

    #[test]
    fn test_task_prompt_is_deterministic() {
        let inputs = RunInputs::new().with("company", "NET");
        let render = || {
            task_prompt(
                &recommendation(),
                &toolset(),
                &inputs,
                &[("research", "x")],
                ToolProtocol::Native,
            )
            .unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_missing_placeholder_names_task() {
        let err = task_prompt(
            &recommendation(),
            &toolset(),
            &RunInputs::new(),
            &[],
            ToolProtocol::Native,
        )
        .unwrap_err();

        match err {
            CrewError::MissingPlaceholder { task, source } => {
                assert_eq!(task, "investment_recommendation");
                assert_eq!(source.to_string(), "missing value for placeholder '{company}'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_context_block_without_dependencies() {
        let task = Task::builder("research")
            .description("Research {company}")
            .agent(analyst())
            .build()
            .unwrap();
        let inputs = RunInputs::new().with("company", "AAPL");
        let prompt =
            task_prompt(&task, &Toolset::new(), &inputs, &[], ToolProtocol::Native).unwrap();

        assert!(!prompt.user.contains("context you're working with"));
        assert!(!prompt.user.contains("expect criteria"));
        assert!(prompt.system.contains("Thought: I now can give a great answer"));
    }

    #[test]
    fn test_delegated_prompt_keeps_braces_verbatim() {
        let prompt = delegated_prompt(
            &analyst(),
            &Toolset::new(),
            "Summarise {company}",
            "",
            ToolProtocol::Native,
        );
        assert!(prompt.user.starts_with("Current Task: Summarise {company}\n"));
    }
}
