//! JSON types exchanged with the Wayfare booking API.
//!
//! The backend owns these shapes; this crate mirrors them so the client can
//! stay strongly typed. Field names follow the backend's `camelCase` naming
//! and its document ids (`_id`).
//!
//! ```text
//! wayfare (client) --[JSON over HTTP]--> booking API
//! ```

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod packages;
pub mod profile;

pub use admin::DashboardStats;
pub use auth::{AccountRole, ErrorBody, LoginRequest, LoginResponse, MessageResponse, SignupRequest};
pub use bookings::{BookedPackage, Booking, BookingRequest, BookingUser};
pub use packages::{NewPackage, Package};
pub use profile::Profile;
