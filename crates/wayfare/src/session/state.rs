//! Whole-session read, write and clear.

use tracing::{debug, warn};

use super::models::{EMAIL_KEY, ROLE_KEY, SESSION_KEYS, Session, TOKEN_KEY};
use super::{SessionResult, SessionStore};
use crate::auth::Role;

/// Owner of the session keys in a [`SessionStore`].
///
/// Passed explicitly to everything that needs the current actor; only the
/// login and logout flows write through it.
#[derive(Debug)]
pub struct SessionState<S> {
    store: S,
}

impl<S: SessionStore> SessionState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the session. No validation of token shape or role is done.
    ///
    /// An anonymous role or a missing email removes the corresponding key, so
    /// the next [`read`](Self::read) returns exactly what was written.
    pub fn write(&self, token: &str, role: Role, email: Option<&str>) -> SessionResult<()> {
        let role = Some(role.as_str()).filter(|r| !r.is_empty());
        self.store.apply(&[
            (TOKEN_KEY, Some(token)),
            (ROLE_KEY, role),
            (EMAIL_KEY, email),
        ])?;
        debug!(role = role.unwrap_or(""), "session written");
        Ok(())
    }

    /// Current session, taken from one snapshot of the store.
    ///
    /// Missing values read as absent. An unreadable store reads as the
    /// anonymous session.
    pub fn read(&self) -> Session {
        let values = self.store.get_many(&SESSION_KEYS).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read session");
            Vec::new()
        });
        let mut values = values.into_iter();
        let mut next = || values.next().flatten();

        let token = next();
        let role = Role::from_stored(next().as_deref());
        let email = next();
        Session { token, role, email }
    }

    /// Remove every session key. Clearing an empty session is a no-op.
    pub fn clear(&self) {
        let changes: Vec<(&str, Option<&str>)> = SESSION_KEYS.iter().map(|key| (*key, None)).collect();
        match self.store.apply(&changes) {
            Ok(()) => debug!("session cleared"),
            Err(e) => warn!(error = %e, "failed to clear session"),
        }
    }
}
