//! Actor roles.
//!
//! The role carried by a session is a closed set. Stored values that do not
//! name a known role collapse to [`Role::Anonymous`], which no protected route
//! admits.

mod role;

pub use role::Role;
