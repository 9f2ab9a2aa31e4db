//! Session store trait and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{SessionError, SessionResult};

/// String key/value storage holding the session.
///
/// Modelled on browser local storage: absent keys read as `None`, removing an
/// absent key is not an error.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    /// Read several values from one view of the store, in `keys` order.
    ///
    /// Stores that can read a consistent snapshot should override this.
    fn get_many(&self, keys: &[&str]) -> SessionResult<Vec<Option<String>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Remove a value.
    fn remove(&self, key: &str) -> SessionResult<()>;

    /// Apply several changes in one step. `None` removes the key.
    ///
    /// Stores that can commit a batch at once should override this.
    fn apply(&self, changes: &[(&str, Option<&str>)]) -> SessionResult<()> {
        for (key, value) in changes {
            match value {
                Some(value) => self.set(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> SessionResult<T> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| SessionError::Backend(format!("session lock poisoned: {}", e)))?;
        Ok(f(&mut values))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> SessionResult<Vec<Option<String>>> {
        self.with_values(|values| keys.iter().map(|key| values.get(*key).cloned()).collect())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        self.with_values(|values| {
            values.remove(key);
        })
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> SessionResult<()> {
        self.with_values(|values| {
            for (key, value) in changes {
                match value {
                    Some(value) => values.insert(key.to_string(), value.to_string()),
                    None => values.remove(*key),
                };
            }
        })
    }
}
