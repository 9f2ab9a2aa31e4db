//! Login and signup payloads.

use serde::{Deserialize, Serialize};

/// Role an account is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountRole {
    /// Traveler browsing and booking packages.
    User,
    /// Hotel owner publishing packages.
    HotelOwner,
    /// Platform administrator.
    Admin,
}

impl AccountRole {
    /// Wire spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::HotelOwner => "hotelOwner",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "hotelOwner" => Ok(Self::HotelOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: AccountRole,
}

/// `POST /login` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /signup` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    /// Only sent for hotel owners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    /// Only sent for hotel owners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_location: Option<String>,
}

/// Generic acknowledgement carrying an optional human-readable message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The most specific description available.
    pub fn description(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_role_wire_names() {
        assert_eq!(serde_json::to_value(AccountRole::HotelOwner).unwrap(), json!("hotelOwner"));
        assert_eq!("admin".parse::<AccountRole>().unwrap(), AccountRole::Admin);
        assert!("HotelOwner".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_signup_omits_hotel_fields_for_travelers() {
        let request = SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            role: AccountRole::User,
            hotel_name: None,
            hotel_location: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["role"], "user");
        assert!(value.get("hotelName").is_none());
        assert!(value.get("hotelLocation").is_none());
    }

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_value(json!({"message": "Email taken", "error": "conflict"})).unwrap();
        assert_eq!(body.description(), Some("Email taken"));

        let body: ErrorBody = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(body.description(), Some("boom"));
    }
}
