//! Coworker delegation tools
//!
//! An agent with `allow_delegation` receives two extra tools that hand work
//! to another agent of the same crew. The coworker runs its own reasoning
//! loop with its base toolset, so delegation never nests.

use crate::executor::AgentExecutor;
use crate::prompt::delegated_prompt;
use crate::toolset::Toolset;
use async_trait::async_trait;
use crew_core::Agent;
use crew_tools::{Result, Tool, ToolError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub const DELEGATE_WORK: &str = "Delegate work to coworker";
pub const ASK_QUESTION: &str = "Ask question to coworker";

/// An agent that can take delegated work, together with its base toolset
#[derive(Debug, Clone)]
pub struct Coworker {
    pub agent: Arc<Agent>,
    pub toolset: Toolset,
}

#[derive(Debug, Deserialize)]
struct StructuredInput {
    coworker: String,
    #[serde(alias = "question")]
    task: String,
    #[serde(default)]
    context: String,
}

struct Delegation {
    executor: Arc<AgentExecutor>,
    coworkers: Vec<Coworker>,
}

impl Delegation {
    fn roles(&self) -> String {
        self.coworkers
            .iter()
            .map(|c| c.agent.role())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn find(&self, role: &str) -> Option<&Coworker> {
        let role = role.trim();
        self.coworkers
            .iter()
            .find(|c| c.agent.role().eq_ignore_ascii_case(role))
    }

    async fn dispatch(&self, tool: &str, input: &str) -> Result<String> {
        let (role, work, context) = parse_input(input)?;
        let coworker = self.find(&role).ok_or_else(|| {
            ToolError::InvalidInput(format!(
                "coworker '{role}' not found, it must be one of the following options: {}",
                self.roles()
            ))
        })?;

        info!(tool_name = %tool, coworker = %coworker.agent.role(), "Delegating to coworker");
        let prompt = delegated_prompt(
            &coworker.agent,
            &coworker.toolset,
            &work,
            &context,
            self.executor.config().tool_protocol,
        );

        self.executor
            .run(&coworker.agent, &coworker.toolset, prompt)
            .await
            .map(|outcome| outcome.raw)
            .map_err(|e| ToolError::failed(format!("coworker '{role}' could not finish: {e}")))
    }
}

/// Accepts `coworker|task|context` or a JSON object with those fields
fn parse_input(input: &str) -> Result<(String, String, String)> {
    if let Ok(parsed) = serde_json::from_str::<StructuredInput>(input) {
        return Ok((parsed.coworker, parsed.task, parsed.context));
    }

    let mut parts = input.splitn(3, '|').map(str::trim);
    let role = parts.next().unwrap_or_default();
    let work = parts.next().unwrap_or_default();
    let context = parts.next().unwrap_or_default();

    if role.is_empty() || work.is_empty() {
        return Err(ToolError::InvalidInput(
            "expected 'coworker|task|context' with a coworker and a task".to_string(),
        ));
    }
    Ok((role.to_string(), work.to_string(), context.to_string()))
}

/// Hands a complete piece of work to a coworker
pub struct DelegateWorkTool {
    inner: Arc<Delegation>,
    usage: String,
}

/// Asks a coworker a single question
pub struct AskQuestionTool {
    inner: Arc<Delegation>,
    usage: String,
}

/// Build the pair of delegation tools over `coworkers`
pub fn delegation_tools(
    executor: Arc<AgentExecutor>,
    coworkers: Vec<Coworker>,
) -> (DelegateWorkTool, AskQuestionTool) {
    let inner = Arc::new(Delegation {
        executor,
        coworkers,
    });
    let roles = inner.roles();

    let delegate = DelegateWorkTool {
        usage: format!(
            "Delegate a specific task to one of the following coworkers: {roles}. \
             The input should be the coworker, the task you want them to do, and ALL necessary \
             context to execute the task, separated by '|' (coworker|task|context). \
             They know nothing about the task, so share absolutely everything you know."
        ),
        inner: Arc::clone(&inner),
    };
    let ask = AskQuestionTool {
        usage: format!(
            "Ask a specific question to one of the following coworkers: {roles}. \
             The input should be the coworker, the question you have for them, and ALL necessary \
             context to ask the question properly, separated by '|' (coworker|question|context). \
             They know nothing about the question, so share absolutely everything you know."
        ),
        inner,
    };
    (delegate, ask)
}

#[async_trait]
impl Tool for DelegateWorkTool {
    fn name(&self) -> &str {
        DELEGATE_WORK
    }

    fn usage_doc(&self) -> &str {
        &self.usage
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        self.inner.dispatch(DELEGATE_WORK, input).await
    }
}

#[async_trait]
impl Tool for AskQuestionTool {
    fn name(&self) -> &str {
        ASK_QUESTION
    }

    fn usage_doc(&self) -> &str {
        &self.usage
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        self.inner.dispatch(ASK_QUESTION, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, client};
    use crew_llm::{LLMError, Message};

    fn coworker(role: &str) -> Coworker {
        Coworker {
            agent: Arc::new(Agent::builder(role).goal("Help").build().unwrap()),
            toolset: Toolset::new(),
        }
    }

    fn tools(provider: Arc<ScriptedProvider>) -> (DelegateWorkTool, AskQuestionTool) {
        let executor = Arc::new(AgentExecutor::new(client(provider)));
        delegation_tools(executor, vec![coworker("Researcher"), coworker("Financial Analyst")])
    }

    #[test]
    fn test_parse_pipe_input() {
        let (role, work, context) = parse_input("Researcher | Find news on AAPL | ").unwrap();
        assert_eq!(role, "Researcher");
        assert_eq!(work, "Find news on AAPL");
        assert_eq!(context, "");
    }

    #[test]
    fn test_parse_json_input() {
        let (role, work, context) = parse_input(
            r#"{"coworker": "Researcher", "question": "Any lawsuits?", "context": "AAPL"}"#,
        )
        .unwrap();
        assert_eq!((role.as_str(), work.as_str(), context.as_str()), ("Researcher", "Any lawsuits?", "AAPL"));
    }

    #[test]
    fn test_parse_rejects_missing_task() {
        assert!(matches!(parse_input("Researcher"), Err(ToolError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delegate_runs_coworker_loop() {
        let provider = ScriptedProvider::new(vec![Ok(Message::assistant(
            "Final Answer: Three positive headlines.",
        ))]);
        let (delegate, _) = tools(provider.clone());

        let answer = delegate
            .invoke("researcher|Summarise AAPL news|Focus on this week")
            .await
            .unwrap();
        assert_eq!(answer, "Three positive headlines.");

        let request = &provider.requests()[0];
        assert!(request.system.as_deref().unwrap().starts_with("You are Researcher."));
        let user = request.messages[0].text().unwrap();
        assert!(user.contains("Current Task: Summarise AAPL news"));
        assert!(user.contains("Focus on this week"));
    }

    #[tokio::test]
    async fn test_unknown_coworker_lists_options() {
        let (_, ask) = tools(ScriptedProvider::new(vec![]));
        let err = ask.invoke("Portfolio Manager|What now?").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: coworker 'Portfolio Manager' not found, it must be one of the following options: Researcher, Financial Analyst"
        );
    }

    #[tokio::test]
    async fn test_coworker_model_failure_is_tool_error() {
        let (_, ask) = tools(ScriptedProvider::failing(|| LLMError::AuthenticationFailed));
        let err = ask.invoke("Financial Analyst|Debt ratio?").await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
    }

    #[test]
    fn test_usage_lists_roles() {
        let (delegate, ask) = tools(ScriptedProvider::new(vec![]));
        assert!(delegate.usage_doc().contains("Researcher, Financial Analyst"));
        assert!(ask.usage_doc().contains("coworker|question|context"));
    }
}
