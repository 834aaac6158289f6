//! Model client: one provider plus timeout and retry behaviour
//!
//! The reasoning loop talks to the model only through [`ModelClient`], which
//! stamps every request with the configured [`ModelSettings`] and bounds each
//! call with a timeout and a [`RetryPolicy`].

use crate::completion::CompletionRequestBuilder;
use crate::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Result, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Knobs applied to every model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum wait per call, in seconds
    pub timeout_secs: u64,

    /// Retries after the first failed call
    pub max_retries: u32,

    /// Maximum tokens to generate per call
    pub max_tokens: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            max_retries: 3,
            max_tokens: 4096,
        }
    }
}

impl ModelSettings {
    /// Settings for `model` with default knobs
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Provider wrapper applying [`ModelSettings`], a timeout and retries
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LLMProvider>,
    settings: ModelSettings,
    retry: RetryPolicy,
    timeout: Duration,
}

impl ModelClient {
    /// Create a client; the retry budget comes from `settings.max_retries`
    pub fn new(provider: Arc<dyn LLMProvider>, settings: ModelSettings) -> Self {
        let retry = RetryPolicy::with_max_retries(settings.max_retries);
        let timeout = settings.timeout();
        Self {
            provider,
            settings,
            retry,
            timeout,
        }
    }

    /// Replace the retry policy, e.g. with [`RetryPolicy::fast`] in tests
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-call timeout with sub-second precision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// A request builder preloaded with model, temperature and max tokens
    pub fn request(&self) -> CompletionRequestBuilder {
        CompletionRequest::builder(&self.settings.model)
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
    }

    /// Send a request, retrying transient failures with the same request
    #[instrument(skip(self, request), fields(provider = %self.provider.name(), model = %request.model))]
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let timeout = self.timeout;
        self.retry
            .execute("model completion", || {
                let request = request.clone();
                let provider = Arc::clone(&self.provider);
                async move {
                    match tokio::time::timeout(timeout, provider.complete(request)).await {
                        Ok(result) => result,
                        Err(_) => {
                            debug!(timeout_ms = timeout.as_millis() as u64, "Model call timed out");
                            Err(LLMError::Timeout(timeout))
                        }
                    }
                }
            })
            .await
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Role, StopReason, TokenUsage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times with the given kind, then answers "ok"
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        hang: bool,
    }

    #[async_trait]
    impl LLMProvider for Flaky {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.hang {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                return Err(LLMError::RequestFailed("HTTP 502".to_string()));
            }
            Ok(CompletionResponse {
                message: Message::assistant(format!("ok from {}", request.model)),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn flaky(failures: u32, hang: bool) -> Arc<Flaky> {
        Arc::new(Flaky {
            failures,
            calls: AtomicU32::new(0),
            hang,
        })
    }

    #[test]
    fn test_settings_defaults_and_serde() {
        let settings: ModelSettings =
            serde_json::from_str(r#"{"model": "gpt-4o", "max_retries": 1}"#).unwrap();
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_request_preloaded() {
        let client = ModelClient::new(flaky(0, false), ModelSettings::new("local-model").with_temperature(0.2));
        let request = client.request().messages(vec![Message::user("hi")]).build();
        assert_eq!(request.model, "local-model");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, 4096);
        assert_eq!(client.retry_policy().max_attempts, 4);
    }

    #[tokio::test]
    async fn test_transient_failures_retried() {
        let provider = flaky(2, false);
        let client = ModelClient::new(provider.clone(), ModelSettings::default())
            .with_retry_policy(RetryPolicy::fast());

        let response = client
            .complete(client.request().messages(vec![Message::user("hi")]).build())
            .await
            .unwrap();

        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.text(), "ok from gpt-4o-mini");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_calls_time_out_then_give_up() {
        let provider = flaky(u32::MAX, true);
        let client = ModelClient::new(provider.clone(), ModelSettings::default().with_max_retries(2))
            .with_timeout(Duration::from_secs(5));

        let err = client
            .complete(client.request().messages(vec![Message::user("hi")]).build())
            .await
            .unwrap_err();

        match err {
            LLMError::Unavailable { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, LLMError::Timeout(_)));
            }
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }
}
