//! Scripted model provider for exercising reasoning loops without a network

use async_trait::async_trait;
use crew_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, ModelClient,
    ModelSettings, RetryPolicy, StopReason, TokenUsage,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

type Responder = Box<dyn Fn(&CompletionRequest) -> crew_llm::Result<Message> + Send + Sync>;

/// Provider that answers from a script and records every request it receives
pub struct ScriptedProvider {
    responder: Responder,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Answer with `f(request)`
    pub fn from_fn<F>(f: F) -> Arc<Self>
    where
        F: Fn(&CompletionRequest) -> crew_llm::Result<Message> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Replay `replies` in order; an exhausted script is an unexpected response
    pub fn new(replies: Vec<crew_llm::Result<Message>>) -> Arc<Self> {
        let replies = Mutex::new(VecDeque::from(replies));
        Self::from_fn(move |_| {
            replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("script exhausted".into())))
        })
    }

    /// Give the same reply to every request
    pub fn repeating(reply: Message) -> Arc<Self> {
        Self::from_fn(move |_| Ok(reply.clone()))
    }

    /// Fail every request with `error()`
    pub fn failing<F>(error: F) -> Arc<Self>
    where
        F: Fn() -> LLMError + Send + Sync + 'static,
    {
        Self::from_fn(move |_| Err(error()))
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> crew_llm::Result<CompletionResponse> {
        let reply = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let message = reply?;
        let stop_reason = if message.has_tool_uses() {
            StopReason::ToolUse
        } else {
            StopReason::EndTurn
        };
        Ok(CompletionResponse {
            message,
            stop_reason,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A client over `provider` with three fast attempts and a short timeout
pub fn client(provider: Arc<ScriptedProvider>) -> Arc<ModelClient> {
    let settings = ModelSettings::new("scripted-model").with_max_retries(2);
    Arc::new(
        ModelClient::new(provider, settings)
            .with_retry_policy(RetryPolicy::fast())
            .with_timeout(Duration::from_secs(5)),
    )
}
