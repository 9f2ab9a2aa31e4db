//! Viewing and editing the signed-in account's profile.

use tracing::{info, warn};
use wayfare_protocol::Profile;

use super::{FlowError, FlowResult};
use crate::client::ApiClient;
use crate::routes::LOGIN_PATH;
use crate::session::Session;

/// Shown after a successful update.
pub const UPDATED_MESSAGE: &str = "Profile updated successfully";

fn require_email(session: &Session) -> FlowResult<&str> {
    session.email().ok_or(FlowError::Redirect(LOGIN_PATH))
}

/// Fetch the profile of the session's email.
pub async fn load_profile(client: &ApiClient, session: &Session) -> FlowResult<Profile> {
    let email = require_email(session)?;
    client.profile(email).await.map_err(|e| {
        warn!(email, error = %e, "failed to fetch profile");
        FlowError::rejected("Failed to fetch profile", e)
    })
}

/// Apply `changes` (wire field name, value) on top of the stored profile
/// and save it. Returns the profile as sent.
pub async fn update_profile(
    client: &ApiClient,
    session: &Session,
    changes: &[(String, String)],
) -> FlowResult<Profile> {
    let email = require_email(session)?;
    let mut profile = load_profile(client, session).await?;
    for (key, value) in changes {
        profile.set_field(key, value.as_str());
    }

    client.update_profile(email, &profile).await.map_err(|e| {
        warn!(email, error = %e, "failed to update profile");
        FlowError::rejected("Failed to update profile", e)
    })?;
    info!(email, fields = changes.len(), "profile updated");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[tokio::test]
    async fn test_profile_without_email_redirects_to_login() {
        let client = ApiClient::new("http://invalid.invalid/api").unwrap();
        // Signed in, but no email was stored.
        let session = Session::new("abc", Role::User, None);

        let err = load_profile(&client, &session).await.unwrap_err();
        assert!(matches!(err, FlowError::Redirect(LOGIN_PATH)));
    }
}
