//! Configuration for the stock crew
//!
//! Values come from [`StockConfig::default`], the builder, or the process
//! environment (optionally seeded from a `.env` file by the binary).

use crate::error::{Result, StockError};
use crew_llm::ModelSettings;
use crew_llm::providers::OpenAIConfig;
use crew_runtime::ToolProtocol;
use crew_utils::{env_or, env_parse, env_var};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Model used when neither `OPENAI_MODEL_NAME` nor `OPENAI_MODEL` is set
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Where the recommendation task writes its report
pub const DEFAULT_OUTPUT_FILE: &str = "investment_recommendation.md";

/// Configuration for the stock crew and its model service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Chat model name
    pub model: String,

    /// OpenAI-compatible endpoint; `None` means the public OpenAI API
    pub api_base: Option<String>,

    /// API key for the model service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,

    /// Per model call timeout
    pub request_timeout: Duration,

    /// Retries after the first failed model call
    pub max_retries: u32,

    /// Completion token limit per model call
    pub max_tokens: usize,

    /// Reasoning iterations per agent
    pub max_iterations: usize,

    /// Per tool invocation timeout
    pub tool_timeout: Duration,

    /// Recommendation report path, overwritten on each run
    pub output_file: PathBuf,

    /// Use the text `Action:` protocol instead of native function calling
    pub text_tool_protocol: bool,

    /// Let agents hand work to, and ask questions of, their coworkers
    pub allow_delegation: bool,

    /// Telegram bot token
    #[serde(skip_serializing)]
    pub telegram_token: Option<String>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
            api_key: None,
            temperature: 0.7,
            request_timeout: Duration::from_secs(120),
            max_retries: 3,
            max_tokens: 4096,
            max_iterations: crew_core::DEFAULT_MAX_ITERATIONS,
            tool_timeout: Duration::from_secs(30),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            text_tool_protocol: false,
            allow_delegation: true,
            telegram_token: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// | variable | field |
    /// |---|---|
    /// | `OPENAI_MODEL_NAME`, `OPENAI_MODEL` | `model` |
    /// | `OPENAI_API_BASE` | `api_base` |
    /// | `OPENAI_API_KEY` | `api_key` |
    /// | `STOCK_CREW_TEMPERATURE` | `temperature` |
    /// | `STOCK_CREW_REQUEST_TIMEOUT_SECS` | `request_timeout` |
    /// | `STOCK_CREW_MAX_RETRIES` | `max_retries` |
    /// | `STOCK_CREW_MAX_TOKENS` | `max_tokens` |
    /// | `STOCK_CREW_MAX_ITERATIONS` | `max_iterations` |
    /// | `STOCK_CREW_TOOL_TIMEOUT_SECS` | `tool_timeout` |
    /// | `STOCK_CREW_OUTPUT_FILE` | `output_file` |
    /// | `STOCK_CREW_TEXT_TOOLS` | `text_tool_protocol` |
    /// | `STOCK_CREW_ALLOW_DELEGATION` | `allow_delegation` |
    /// | `TELEGRAM_TOKEN` | `telegram_token` |
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            model: env_or(&["OPENAI_MODEL_NAME", "OPENAI_MODEL"], DEFAULT_MODEL),
            api_base: env_var("OPENAI_API_BASE"),
            api_key: env_var("OPENAI_API_KEY"),
            temperature: env_parse("STOCK_CREW_TEMPERATURE")?.unwrap_or(defaults.temperature),
            request_timeout: env_parse("STOCK_CREW_REQUEST_TIMEOUT_SECS")?
                .map_or(defaults.request_timeout, Duration::from_secs),
            max_retries: env_parse("STOCK_CREW_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            max_tokens: env_parse("STOCK_CREW_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            max_iterations: env_parse("STOCK_CREW_MAX_ITERATIONS")?
                .unwrap_or(defaults.max_iterations),
            tool_timeout: env_parse("STOCK_CREW_TOOL_TIMEOUT_SECS")?
                .map_or(defaults.tool_timeout, Duration::from_secs),
            output_file: env_var("STOCK_CREW_OUTPUT_FILE")
                .map_or(defaults.output_file, PathBuf::from),
            text_tool_protocol: env_parse("STOCK_CREW_TEXT_TOOLS")?
                .unwrap_or(defaults.text_tool_protocol),
            allow_delegation: env_parse("STOCK_CREW_ALLOW_DELEGATION")?
                .unwrap_or(defaults.allow_delegation),
            telegram_token: env_var("TELEGRAM_TOKEN"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.max_iterations == 0 {
            return Err(StockError::ConfigError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StockError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.request_timeout.is_zero() || self.tool_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Knobs for the model client
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings::new(&self.model)
            .with_temperature(self.temperature)
            .with_timeout(self.request_timeout)
            .with_max_retries(self.max_retries)
            .with_max_tokens(self.max_tokens)
    }

    /// Connection settings for an OpenAI-compatible provider
    ///
    /// Local servers usually ignore the key, so a missing one is sent as
    /// `not-needed`.
    pub fn openai_config(&self) -> OpenAIConfig {
        let config = OpenAIConfig::new(self.api_key.as_deref().unwrap_or("not-needed"))
            .with_timeout(self.request_timeout.as_secs().max(1));
        match &self.api_base {
            Some(base) => config.with_api_base(base),
            None => config,
        }
    }

    pub fn tool_protocol(&self) -> ToolProtocol {
        if self.text_tool_protocol {
            ToolProtocol::Text
        } else {
            ToolProtocol::Native
        }
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    config: Option<StockConfig>,
}

impl StockConfigBuilder {
    fn config(&mut self) -> &mut StockConfig {
        self.config.get_or_insert_with(StockConfig::default)
    }

    /// Start from environment values instead of the defaults
    pub fn from_env(mut self) -> Result<Self> {
        self.config = Some(StockConfig::from_env()?);
        Ok(self)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config().model = model.into();
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config().api_base = Some(api_base.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config().api_key = Some(api_key.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config().temperature = temperature;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config().request_timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config().max_retries = retries;
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config().max_tokens = max_tokens;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config().max_iterations = max_iterations;
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config().tool_timeout = timeout;
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config().output_file = path.into();
        self
    }

    pub fn text_tool_protocol(mut self, enabled: bool) -> Self {
        self.config().text_tool_protocol = enabled;
        self
    }

    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.config().allow_delegation = allow;
        self
    }

    pub fn telegram_token(mut self, token: impl Into<String>) -> Self {
        self.config().telegram_token = Some(token.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> Result<StockConfig> {
        let config = self.config.take().unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.output_file, PathBuf::from("investment_recommendation.md"));
        assert!(config.allow_delegation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StockConfig::builder()
            .model("local-model")
            .api_base("http://localhost:1234/v1")
            .max_retries(5)
            .request_timeout(Duration::from_secs(60))
            .text_tool_protocol(true)
            .build()
            .unwrap();

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.tool_protocol(), ToolProtocol::Text);
        assert_eq!(config.openai_config().api_base, "http://localhost:1234/v1");
        assert_eq!(config.openai_config().api_key, "not-needed");
    }

    #[test]
    fn test_validation() {
        assert!(StockConfig::builder().max_iterations(0).build().is_err());
        assert!(StockConfig::builder().temperature(2.5).build().is_err());
        assert!(StockConfig::builder().tool_timeout(Duration::ZERO).build().is_err());
        assert!(StockConfig::builder().temperature(0.0).build().is_ok());
    }

    #[test]
    fn test_model_settings() {
        let settings = StockConfig::builder()
            .temperature(0.2)
            .max_retries(1)
            .build()
            .unwrap()
            .model_settings();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = StockConfig::builder()
            .api_key("sk-secret")
            .telegram_token("123:abc")
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("123:abc"));
    }

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("OPENAI_MODEL_NAME", "env-model");
            std::env::set_var("STOCK_CREW_MAX_ITERATIONS", "7");
            std::env::set_var("STOCK_CREW_TOOL_TIMEOUT_SECS", "12");
        }

        let config = StockConfig::from_env().unwrap();
        assert_eq!(config.model, "env-model");
        assert_eq!(config.max_iterations, 7);
        assert_eq!(config.tool_timeout, Duration::from_secs(12));

        unsafe {
            std::env::set_var("STOCK_CREW_MAX_ITERATIONS", "many");
        }
        assert!(matches!(StockConfig::from_env(), Err(StockError::ConfigError(_))));

        unsafe {
            std::env::remove_var("OPENAI_MODEL_NAME");
            std::env::remove_var("STOCK_CREW_MAX_ITERATIONS");
            std::env::remove_var("STOCK_CREW_TOOL_TIMEOUT_SECS");
        }
    }
}
