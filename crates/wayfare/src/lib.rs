//! Wayfare client library.
//!
//! The booking platform's business logic lives behind an HTTP API. This crate
//! holds everything on the client side of that boundary:
//!
//! - [`session`]: the persisted record of who is signed in
//! - [`guard`]: the access decision made on every protected navigation
//! - [`nav`]: the role-conditioned navigation menu
//! - [`routes`]: the route table and the navigator that ties the two together
//! - [`client`]: a typed async client for the booking API
//! - [`flows`]: the form handlers behind each page
//! - [`settings`]: layered configuration

pub mod auth;
pub mod client;
pub mod flows;
pub mod guard;
pub mod nav;
pub mod routes;
pub mod session;
pub mod settings;

pub use wayfare_protocol as protocol;
