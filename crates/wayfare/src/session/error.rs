//! Session storage error types.

use thiserror::Error;

/// Result type for session storage operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by a session store.
///
/// These only surface from [`SessionState::write`](super::SessionState::write).
/// Reads and clears log them and carry on.
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store backend error.
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::Backend("lock poisoned".to_string());
        assert_eq!(err.to_string(), "backend error: lock poisoned");
    }
}
