//! Route guard.
//!
//! Decides, on every navigation to a protected view, whether the current
//! session may see it. The decision is a pure function of the session and the
//! route's allow-list and is never cached, so a logout from elsewhere takes
//! effect on the next navigation.

use crate::auth::Role;
use crate::routes::{AllowList, LOGIN_PATH, RouteDescriptor};
use crate::session::Session;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the protected view.
    Allow,
    /// Send the actor elsewhere instead.
    Redirect(&'static str),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Admit iff the session carries a non-empty token and its role is allowed.
pub fn authorize(session: &Session, allowed: &[Role]) -> Access {
    if !session.is_authenticated() {
        return Access::Redirect(LOGIN_PATH);
    }
    if session.role.is_anonymous() || !allowed.contains(&session.role) {
        return Access::Redirect(LOGIN_PATH);
    }
    Access::Allow
}

/// Guard check for a route from the table. Public routes always admit.
pub fn authorize_route(session: &Session, route: &RouteDescriptor) -> Access {
    match route.allowed {
        AllowList::Public => Access::Allow,
        AllowList::Roles(roles) => authorize(session, roles),
    }
}
