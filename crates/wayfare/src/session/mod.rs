//! Session state.
//!
//! The session is the client-held record of the signed-in actor: a bearer
//! token, a role and an email. It is written as a whole on login and removed
//! as a whole on logout. A non-empty token is the only signal of being
//! authenticated; the client never checks expiry or signatures, the API
//! rejects stale tokens on the next call.
//!
//! Storage sits behind [`SessionStore`], a small string key/value seam:
//! - [`MemoryStore`] keeps values in process
//! - [`FileStore`] persists them to a JSON file in the state directory

mod error;
mod file;
mod models;
mod state;
mod store;

pub use error::{SessionError, SessionResult};
pub use file::FileStore;
pub use models::{EMAIL_KEY, ROLE_KEY, SESSION_KEYS, Session, TOKEN_KEY};
pub use state::SessionState;
pub use store::{MemoryStore, SessionStore};
