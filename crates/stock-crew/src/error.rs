//! Error types for stock data and crew setup

use crew_tools::ToolError;
use thiserror::Error;

/// Stock crew specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Tool input that is not a usable URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Model provider could not be created
    #[error("Model provider error: {0}")]
    Provider(#[from] crew_llm::LLMError),

    /// Crew definition rejected
    #[error(transparent)]
    Crew(#[from] crew_core::CrewError),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<crew_utils::EnvError> for StockError {
    fn from(err: crew_utils::EnvError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

impl From<yahoo_finance_api::YahooError> for StockError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        StockError::YahooFinanceError(err.to_string())
    }
}

/// Data failures become tool errors the agent reads as observations
impl From<StockError> for ToolError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidSymbol(_) | StockError::InvalidUrl { .. } => {
                ToolError::InvalidInput(err.to_string())
            }
            other => ToolError::Failed(other.to_string()),
        }
    }
}
