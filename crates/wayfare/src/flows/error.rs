//! Page flow errors.

use thiserror::Error;

use crate::client::ClientError;
use crate::session::SessionError;

/// Result type for page flows.
pub type FlowResult<T> = Result<T, FlowError>;

/// Why a page action did not complete.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Form input rejected before any request was made.
    #[error("{0}")]
    Invalid(String),

    /// The API refused the action. `message` is what the page shows.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ClientError,
    },

    /// The action needs a signed-in session.
    #[error("Redirecting to {0}")]
    Redirect(&'static str),

    /// API failure with no page-specific message.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The session could not be saved.
    #[error("failed to save session: {0}")]
    Session(#[from] SessionError),
}

impl FlowError {
    pub(crate) fn rejected(message: impl Into<String>, source: ClientError) -> Self {
        Self::Rejected {
            message: message.into(),
            source,
        }
    }
}
