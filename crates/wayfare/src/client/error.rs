//! API client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for API client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the booking API.
///
/// `message` fields hold the body's `message` (or `error`) and are `None`
/// when the server sent neither.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API could not be reached.
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Missing, stale or insufficient credentials.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized { message: Option<String> },

    /// Resource not found.
    #[error("Not found: {}", .message.as_deref().unwrap_or(.path.as_str()))]
    NotFound { path: String, message: Option<String> },

    /// The API returned an error response.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or(reason(*.status)))]
    Api { status: u16, message: Option<String> },

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
}

impl ClientError {
    /// Message supplied by the server, when the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::NotFound { message, .. } | Self::Api { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// True when the API answered with an error status, as opposed to the
    /// request never getting a response.
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::NotFound { .. } | Self::Api { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 409,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(err.to_string(), "API error (409): Email already registered");
        assert_eq!(err.server_message(), Some("Email already registered"));
    }

    #[test]
    fn test_message_less_response_falls_back_to_reason() {
        let err = ClientError::Api {
            status: 400,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (400): Bad Request");
        assert!(err.server_message().is_none());
        assert!(err.is_response());
    }

    #[test]
    fn test_parse_error_has_no_server_message() {
        let err = ClientError::Parse("eof".to_string());
        assert!(err.server_message().is_none());
        assert!(!err.is_response());
    }
}
