//! Login, logout and signup.

use tracing::{info, warn};
use wayfare_protocol::{AccountRole, LoginRequest, SignupRequest};

use super::{FlowError, FlowResult, require_field};
use crate::client::{ApiClient, ClientError};
use crate::routes::{HOME_PATH, LOGIN_PATH, VERIFY_OTP_PATH};
use crate::session::{SessionState, SessionStore};

/// Login form contents.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<AccountRole>,
}

/// Check credentials with the API and, on success, write the session.
///
/// Returns the path to navigate to next.
pub async fn login<S: SessionStore>(
    client: &ApiClient,
    state: &SessionState<S>,
    form: &LoginForm,
) -> FlowResult<&'static str> {
    require_field(&form.email, "Email is required")?;
    require_field(&form.password, "Password is required")?;
    let role = form
        .role
        .ok_or_else(|| FlowError::Invalid("Please select a role".to_string()))?;

    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password.clone(),
        role,
    };
    let response = client.login(&request).await.map_err(|e| {
        warn!(email = %form.email, error = %e, "login failed");
        FlowError::rejected("Invalid credentials", e)
    })?;

    state.write(&response.token, role.into(), Some(&form.email))?;
    info!(email = %form.email, %role, "logged in");
    Ok(HOME_PATH)
}

/// Clear the session, then hand back the login path.
pub fn logout<S: SessionStore>(state: &SessionState<S>) -> &'static str {
    state.clear();
    info!("logged out");
    LOGIN_PATH
}

/// Signup form contents.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<AccountRole>,
    /// Required for hotel owners, ignored otherwise.
    pub hotel_name: Option<String>,
    /// Required for hotel owners, ignored otherwise.
    pub hotel_location: Option<String>,
}

impl SignupForm {
    /// Validate the form and build the request body.
    pub fn into_request(self) -> FlowResult<SignupRequest> {
        require_field(&self.name, "Name is required")?;
        require_field(&self.email, "Email is required")?;
        require_field(&self.password, "Password is required")?;
        let role = self
            .role
            .ok_or_else(|| FlowError::Invalid("Please select a role".to_string()))?;

        let (hotel_name, hotel_location) = if role == AccountRole::HotelOwner {
            let name = self.hotel_name.unwrap_or_default();
            let location = self.hotel_location.unwrap_or_default();
            require_field(&name, "Hotel name is required")?;
            require_field(&location, "Hotel location is required")?;
            (Some(name), Some(location))
        } else {
            (None, None)
        };

        Ok(SignupRequest {
            name: self.name,
            email: self.email,
            password: self.password,
            role,
            hotel_name,
            hotel_location,
        })
    }
}

/// Where a successful signup leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    /// Next path (OTP verification).
    pub redirect: &'static str,
    /// Email to verify, carried to the next page.
    pub email: String,
    /// Server acknowledgement, if any.
    pub message: Option<String>,
}

/// Message shown for a failed signup: the server's own words, a generic
/// refusal when it answered without any, or a transport failure otherwise.
fn signup_failure(err: &ClientError) -> String {
    match err.server_message() {
        Some(message) => message.to_string(),
        None if err.is_response() => "Signup failed".to_string(),
        None => "An unexpected error occurred".to_string(),
    }
}

/// Register an account. Does not sign in.
pub async fn signup(client: &ApiClient, form: SignupForm) -> FlowResult<SignupOutcome> {
    let request = form.into_request()?;
    let response = client.signup(&request).await.map_err(|e| {
        warn!(email = %request.email, error = %e, "signup failed");
        FlowError::rejected(signup_failure(&e), e)
    })?;

    info!(email = %request.email, role = %request.role, "signed up");
    Ok(SignupOutcome {
        redirect: VERIFY_OTP_PATH,
        email: request.email,
        message: response.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn signup_form(role: Option<AccountRole>) -> SignupForm {
        SignupForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            role,
            hotel_name: Some("Seaside Inn".to_string()),
            hotel_location: Some("Goa".to_string()),
        }
    }

    #[test]
    fn test_signup_requires_role() {
        let err = signup_form(None).into_request().unwrap_err();
        assert_eq!(err.to_string(), "Please select a role");
    }

    #[test]
    fn test_signup_drops_hotel_fields_for_travelers() {
        let request = signup_form(Some(AccountRole::User)).into_request().unwrap();
        assert!(request.hotel_name.is_none());
        assert!(request.hotel_location.is_none());
    }

    #[test]
    fn test_signup_hotel_owner_needs_hotel_details() {
        let request = signup_form(Some(AccountRole::HotelOwner))
            .into_request()
            .unwrap();
        assert_eq!(request.hotel_name.as_deref(), Some("Seaside Inn"));

        let mut form = signup_form(Some(AccountRole::HotelOwner));
        form.hotel_location = Some("  ".to_string());
        let err = form.into_request().unwrap_err();
        assert_eq!(err.to_string(), "Hotel location is required");
    }

    #[test]
    fn test_signup_failure_messages() {
        let taken = ClientError::Api {
            status: 409,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(signup_failure(&taken), "Email already registered");

        let bare = ClientError::Api {
            status: 400,
            message: None,
        };
        assert_eq!(signup_failure(&bare), "Signup failed");

        let offline = ClientError::ConnectionFailed {
            url: "http://127.0.0.1:1/api/signup".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(signup_failure(&offline), "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_login_without_role_makes_no_request() {
        // Unroutable base URL: the test fails if a request is attempted.
        let client = ApiClient::new("http://invalid.invalid/api").unwrap();
        let state = SessionState::new(MemoryStore::new());
        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            role: None,
        };

        let err = login(&client, &state, &form).await.unwrap_err();
        assert!(matches!(err, FlowError::Invalid(ref m) if m == "Please select a role"));
        assert!(!state.read().is_authenticated());
    }

    #[test]
    fn test_logout_clears_and_redirects() {
        let state = SessionState::new(MemoryStore::new());
        state
            .write("abc", crate::auth::Role::User, Some("ada@example.com"))
            .unwrap();

        assert_eq!(logout(&state), LOGIN_PATH);
        assert!(!state.read().is_authenticated());
    }
}
