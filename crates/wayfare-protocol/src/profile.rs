//! Account profile.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile record as stored by the backend.
///
/// The backend treats the profile as a loose document, so every field is
/// optional and unrecognised fields are carried through on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Image URL or data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Set a field by its wire name. Known fields are typed, others go to `extra`.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "name" => self.name = Some(value),
            "email" => self.email = Some(value),
            "role" => self.role = Some(value),
            "profileImage" => self.profile_image = Some(value),
            "companyName" => self.company_name = Some(value),
            "companyLocation" => self.company_location = Some(value),
            "linkedin" => self.linkedin = Some(value),
            other => {
                self.extra.insert(other.to_string(), Value::String(value));
            }
        }
    }
}
