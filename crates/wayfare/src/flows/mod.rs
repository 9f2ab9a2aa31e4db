//! Page flows.
//!
//! The form handlers behind each page, kept free of any rendering so the
//! terminal front end and the tests drive the same code.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalog;
mod error;
pub mod profile;

pub use error::{FlowError, FlowResult};

use crate::routes::LOGIN_PATH;
use crate::session::Session;

/// Bearer token of a signed-in session, or a redirect to the login page.
pub(crate) fn require_token(session: &Session) -> FlowResult<&str> {
    session.bearer().ok_or(FlowError::Redirect(LOGIN_PATH))
}

/// Reject a blank required form field.
pub(crate) fn require_field(value: &str, message: &str) -> FlowResult<()> {
    if value.trim().is_empty() {
        return Err(FlowError::Invalid(message.to_string()));
    }
    Ok(())
}
