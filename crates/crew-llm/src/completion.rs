//! One model turn: the request an agent sends and the reply it gets back

use crate::{Message, ToolDefinition};

/// Everything a provider needs for one turn of an agent's conversation
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,

    /// Role, goal and format instructions
    pub system: Option<String>,

    /// Task prompt followed by the assistant replies and observations so far
    pub messages: Vec<Message>,

    pub max_tokens: usize,
    pub temperature: Option<f32>,

    /// Native function-calling tools; `None` when the agent has none
    pub tools: Option<Vec<ToolDefinition>>,

    /// Text at which the provider must stop, e.g. before an `Observation:`
    pub stop_sequences: Option<Vec<String>>,
}

impl CompletionRequest {
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder {
            request: Self {
                model: model.into(),
                system: None,
                messages: Vec::new(),
                max_tokens: 1024,
                temperature: None,
                tools: None,
                stop_sequences: None,
            },
        }
    }

    /// Names of the tools offered natively in this turn
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().flatten().map(|tool| tool.name.as_str())
    }
}

/// Builder returned by [`CompletionRequest::builder`] and `ModelClient::request`
#[derive(Debug, Clone)]
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Replace the conversation
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.temperature = Some(temperature);
        self
    }

    /// Offer tools for native calling; an empty list offers none
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    /// Add a stop sequence
    pub fn stop_at(mut self, sequence: impl Into<String>) -> Self {
        self.request
            .stop_sequences
            .get_or_insert_with(Vec::new)
            .push(sequence.into());
        self
    }

    pub fn build(self) -> CompletionRequest {
        self.request
    }
}

/// The assistant's reply to one request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text of the reply, empty when it only calls tools
    pub fn text(&self) -> String {
        self.message.text().unwrap_or_default()
    }

    /// The reply was cut off by `max_tokens`
    pub fn is_truncated(&self) -> bool {
        self.stop_reason == StopReason::MaxTokens
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model finished its turn or hit a stop sequence
    EndTurn,
    MaxTokens,
    /// The model asked for one or more tools
    ToolUse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}
