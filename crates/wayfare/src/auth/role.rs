//! Session role.

use tracing::warn;
use wayfare_protocol::AccountRole;

/// Role of the current actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Not signed in, or the stored role was not recognised.
    #[default]
    Anonymous,
    /// Traveler.
    User,
    /// Hotel owner.
    HotelOwner,
    /// Administrator.
    Admin,
}

impl Role {
    /// Storage spelling. Anonymous is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "",
            Role::User => "user",
            Role::HotelOwner => "hotelOwner",
            Role::Admin => "admin",
        }
    }

    /// Name shown on the login role picker.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Anonymous => "Guest",
            Role::User => "Traveler",
            Role::HotelOwner => "Host",
            Role::Admin => "Explorer",
        }
    }

    pub fn is_anonymous(&self) -> bool {
        *self == Role::Anonymous
    }

    /// The account role, if this is a signed-in role.
    pub fn account(&self) -> Option<AccountRole> {
        match self {
            Role::Anonymous => None,
            Role::User => Some(AccountRole::User),
            Role::HotelOwner => Some(AccountRole::HotelOwner),
            Role::Admin => Some(AccountRole::Admin),
        }
    }

    /// Normalize a stored value. Missing, empty or unknown values become `Anonymous`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Role::Anonymous,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(role = raw, "unrecognised stored role, treating session as anonymous");
                Role::Anonymous
            }),
        }
    }
}

impl From<AccountRole> for Role {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::User => Role::User,
            AccountRole::HotelOwner => Role::HotelOwner,
            AccountRole::Admin => Role::Admin,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Anonymous => write!(f, "anonymous"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<AccountRole>().map(Role::from)
    }
}
