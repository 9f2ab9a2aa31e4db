//! Booking API client module.
//!
//! Provides an async client for the travel booking REST API.

mod api;
mod error;

pub use api::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
