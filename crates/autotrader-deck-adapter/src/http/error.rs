/*
[INPUT]:  Error sources (HTTP, API, serialization, WebSocket, configuration)
[OUTPUT]: Structured error types with context and a transient-failure hint
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the dashboard adapter
#[derive(Error, Debug)]
pub enum DeckError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timed out in the transport
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl DeckError {
    /// Whether the failure is likely to clear up on the next batch.
    ///
    /// Only used to choose a log level; nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        match self {
            DeckError::Http(_)
            | DeckError::Timeout { .. }
            | DeckError::WebSocket(_)
            | DeckError::InvalidResponse(_) => true,
            DeckError::Api { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        DeckError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_transient() {
        assert!(DeckError::Timeout { duration: 30 }.is_transient());
        assert!(DeckError::api_error(StatusCode::SERVICE_UNAVAILABLE, "down").is_transient());
        assert!(DeckError::api_error(StatusCode::TOO_MANY_REQUESTS, "slow down").is_transient());
        assert!(!DeckError::api_error(StatusCode::NOT_FOUND, "missing").is_transient());
        assert!(!DeckError::Config("bad".to_string()).is_transient());
    }

    #[test]
    fn test_api_error_creation() {
        let err = DeckError::api_error(StatusCode::BAD_REQUEST, "Invalid window");
        match err {
            DeckError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid window");
            }
            _ => panic!("Expected Api error variant"),
        }
    }
}
