//! Error types for LLM operations

use std::time::Duration;
use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed (network trouble or a server-side status)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// No response within the configured timeout
    #[error("Model call timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// Every retry attempt failed with a transient error
    #[error("Gave up after {attempts} attempt(s): {last}")]
    Unavailable {
        /// Calls made
        attempts: u32,
        /// Error from the final attempt
        last: Box<LLMError>,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether repeating the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::RateLimitExceeded(_) | Self::Timeout(_) => true,
            #[cfg(feature = "openai")]
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Number of calls that led to this error
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Unavailable { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LLMError::RequestFailed("HTTP 503".to_string()).is_transient());
        assert!(LLMError::RateLimitExceeded("slow down".to_string()).is_transient());
        assert!(LLMError::Timeout(Duration::from_secs(1)).is_transient());

        assert!(!LLMError::AuthenticationFailed.is_transient());
        assert!(!LLMError::InvalidRequest("bad".to_string()).is_transient());
        assert!(!LLMError::UnexpectedResponse("garbled".to_string()).is_transient());
    }

    #[test]
    fn test_unavailable_reports_attempts() {
        let err = LLMError::Unavailable {
            attempts: 4,
            last: Box::new(LLMError::Timeout(Duration::from_secs(2))),
        };
        assert_eq!(err.attempts(), 4);
        assert_eq!(
            err.to_string(),
            "Gave up after 4 attempt(s): Model call timed out after 2s"
        );
        assert_eq!(LLMError::AuthenticationFailed.attempts(), 1);
    }
}
