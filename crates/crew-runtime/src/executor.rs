//! Agent executor for running bounded reasoning loops
//!
//! The AgentExecutor implements the loop one agent runs for one task:
//! 1. Query the model with the conversation so far (Thinking)
//! 2. Parse the reply into a [`Decision`]
//! 3. If tools are requested, run them and feed results back (ToolCall)
//! 4. Stop on a final answer (Done) or when the budget runs out (Exhausted)
//!
//! Tool failures and unauthorized tool requests are observations for the
//! model, never errors. Only an unreachable model service aborts the loop.

use crate::parser::{self, Decision, ToolRequest};
use crate::prompt::{OBSERVATION_STOP, TaskPrompt, ToolProtocol};
use crate::toolset::Toolset;
use crew_core::{Agent, CrewError, Result, TaskStatus};
use crew_llm::{LLMError, Message, ModelClient};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const EMPTY_ANSWER_NUDGE: &str =
    "Your reply did not contain an answer. Provide your response using the Final Answer format.";

/// Configuration shared by every loop an executor runs
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// How tools are offered to the model
    pub tool_protocol: ToolProtocol,
}

impl ExecutorConfig {
    pub fn with_tool_protocol(mut self, protocol: ToolProtocol) -> Self {
        self.tool_protocol = protocol;
        self
    }
}

/// How one reasoning loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutcome {
    /// Final answer, or the best partial answer when exhausted; never empty
    pub raw: String,
    pub status: TaskStatus,
    /// Model queries made
    pub iterations: usize,
}

/// Runs reasoning loops against a shared [`ModelClient`]
#[derive(Debug, Clone)]
pub struct AgentExecutor {
    client: Arc<ModelClient>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    pub fn new(client: Arc<ModelClient>) -> Self {
        Self::with_config(client, ExecutorConfig::default())
    }

    pub fn with_config(client: Arc<ModelClient>, config: ExecutorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<ModelClient> {
        &self.client
    }

    /// Run `agent` on `prompt` with the tools in `toolset`
    pub async fn run(
        &self,
        agent: &Agent,
        toolset: &Toolset,
        prompt: TaskPrompt,
    ) -> Result<AgentOutcome> {
        let max_iterations = agent.max_iterations();
        let mut conversation = vec![Message::user(prompt.user)];
        let mut last_text = String::new();

        for iteration in 1..=max_iterations {
            info!(
                agent = %agent.role(),
                iteration = iteration,
                max_iterations = max_iterations,
                "Agent iteration started"
            );

            let mut builder = self
                .client
                .request()
                .system(prompt.system.clone())
                .messages(conversation.clone());
            builder = match self.config.tool_protocol {
                ToolProtocol::Native => builder.tools(toolset.definitions()),
                ToolProtocol::Text if !toolset.is_empty() => {
                    builder.stop_at(OBSERVATION_STOP)
                }
                ToolProtocol::Text => builder,
            };

            let response = self
                .client
                .complete(builder.build())
                .await
                .map_err(model_unavailable)?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            if response.is_truncated() {
                warn!(iteration = iteration, "LLM response cut off at the token limit");
            }

            let text = response.text();
            let response_preview: String = text.chars().take(300).collect();
            debug!(response_preview = %response_preview, "LLM response content preview");

            let decision = parser::parse(&response.message);
            conversation.push(response.message);
            if !text.trim().is_empty() {
                last_text = text;
            }

            match decision {
                Decision::FinalAnswer(answer) if !answer.is_empty() => {
                    info!(
                        agent = %agent.role(),
                        iteration = iteration,
                        response_length = answer.len(),
                        "Agent completed naturally"
                    );
                    return Ok(AgentOutcome {
                        raw: answer,
                        status: TaskStatus::Completed,
                        iterations: iteration,
                    });
                }
                Decision::FinalAnswer(_) => {
                    warn!(agent = %agent.role(), iteration = iteration, "Empty answer from model");
                    conversation.push(Message::user(EMPTY_ANSWER_NUDGE));
                }
                Decision::UseTools(requests) if iteration < max_iterations => {
                    info!(tool_count = requests.len(), "Agent requested tool use");
                    for request in requests {
                        conversation.push(self.observe(toolset, request).await);
                    }
                }
                Decision::UseTools(requests) => {
                    debug!(
                        tool_count = requests.len(),
                        "Tool requests in final iteration are not executed"
                    );
                }
            }
        }

        let mut raw = parser::strip_tool_syntax(&last_text);
        if raw.is_empty() {
            raw = format!("Agent stopped after {max_iterations} iterations without a final answer.");
        }
        warn!(
            agent = %agent.role(),
            max_iterations = max_iterations,
            "Max iterations reached, returning partial answer"
        );

        Ok(AgentOutcome {
            raw,
            status: TaskStatus::Exhausted,
            iterations: max_iterations,
        })
    }

    /// Run one tool request and turn the result into the next message
    async fn observe(&self, toolset: &Toolset, request: ToolRequest) -> Message {
        let input_preview: String = request.input.chars().take(500).collect();
        info!(
            tool_name = %request.name,
            tool_id = ?request.id,
            input_preview = %input_preview,
            "Executing tool"
        );

        let start_time = Instant::now();
        let result = toolset.invoke(&request.name, &request.input).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let (content, failed) = match result {
            Ok(output) => {
                let result_preview: String = output.chars().take(500).collect();
                info!(
                    tool_name = %request.name,
                    duration_ms = duration_ms,
                    result_length = output.len(),
                    result_preview = %result_preview,
                    "Tool execution succeeded"
                );
                (output, false)
            }
            Err(e) => {
                warn!(
                    tool_name = %request.name,
                    duration_ms = duration_ms,
                    error = %e,
                    "Tool execution failed"
                );
                (format!("Error: {e}"), true)
            }
        };

        match (request.id, failed) {
            (Some(id), false) => Message::tool_result(id, content),
            (Some(id), true) => Message::tool_error(id, content),
            (None, _) => Message::user(format!("Observation: {content}")),
        }
    }
}

fn model_unavailable(error: LLMError) -> CrewError {
    warn!(error = %error, "Model service unavailable");
    match error {
        LLMError::Unavailable { attempts, last } => CrewError::ModelUnavailable {
            attempts,
            reason: last.to_string(),
        },
        other => CrewError::ModelUnavailable {
            attempts: other.attempts(),
            reason: other.to_string(),
        },
    }
}
