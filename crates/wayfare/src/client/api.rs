//! Booking API HTTP client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use wayfare_protocol::{
    Booking, BookingRequest, DashboardStats, ErrorBody, LoginRequest, LoginResponse,
    MessageResponse, NewPackage, Package, Profile, SignupRequest,
};

use super::error::{ClientError, ClientResult};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header the profile endpoints identify the account by.
const EMAIL_HEADER: &str = "email";

/// Client for the booking API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// Base URL including the `/api` prefix (e.g., "http://localhost:5000/api").
    base_url: String,
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one item under `collection`, with `id` encoded as a single
    /// path segment.
    fn item_url(&self, collection: &str, id: &str) -> ClientResult<String> {
        if matches!(id, "" | "." | "..") {
            return Err(ClientError::InvalidUrl(format!("invalid id: {:?}", id)));
        }
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url.into())
    }

    /// Check if the API is reachable and healthy.
    pub async fn health_check(&self) -> ClientResult<bool> {
        let url = self.url("/health");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(response.status().is_success())
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let url = self.url("/login");
        self.send_json(self.client.post(&url).json(request), &url)
            .await
    }

    /// Register a new account.
    ///
    /// The success body is informational only, so an unparseable one is not
    /// treated as an error.
    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<MessageResponse> {
        let url = self.url("/signup");
        let response = self.send(self.client.post(&url).json(request), &url).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    /// List every package.
    pub async fn list_packages(&self) -> ClientResult<Vec<Package>> {
        let url = self.url("/packages");
        self.send_json(self.client.get(&url), &url).await
    }

    /// List the featured packages shown on the home page.
    pub async fn featured_packages(&self) -> ClientResult<Vec<Package>> {
        let url = self.url("/packages/featured");
        self.send_json(self.client.get(&url), &url).await
    }

    /// Get a single package.
    pub async fn get_package(&self, id: &str) -> ClientResult<Package> {
        let url = self.item_url("/packages", id)?;
        self.send_json(self.client.get(&url), &url).await
    }

    /// Publish a package (hotel owners).
    pub async fn create_package(&self, token: &str, package: &NewPackage) -> ClientResult<()> {
        let url = self.url("/packages");
        self.send(self.client.post(&url).bearer_auth(token).json(package), &url)
            .await?;
        Ok(())
    }

    /// Book a package (travelers).
    pub async fn create_booking(&self, token: &str, booking: &BookingRequest) -> ClientResult<()> {
        let url = self.url("/bookings");
        self.send(self.client.post(&url).bearer_auth(token).json(booking), &url)
            .await?;
        Ok(())
    }

    /// Bookings of the signed-in traveler.
    pub async fn my_bookings(&self, token: &str) -> ClientResult<Vec<Booking>> {
        let url = self.url("/bookings/my-bookings");
        self.send_json(self.client.get(&url).bearer_auth(token), &url)
            .await
    }

    /// Every booking on the platform (administrators).
    pub async fn all_bookings(&self, token: &str) -> ClientResult<Vec<Booking>> {
        let url = self.url("/admin/all-bookings");
        self.send_json(self.client.get(&url).bearer_auth(token), &url)
            .await
    }

    /// Delete a booking (administrators).
    pub async fn delete_booking(&self, token: &str, id: &str) -> ClientResult<()> {
        let url = self.item_url("/bookings", id)?;
        self.send(self.client.delete(&url).bearer_auth(token), &url)
            .await?;
        Ok(())
    }

    /// Platform statistics (administrators).
    pub async fn dashboard(&self, token: &str) -> ClientResult<DashboardStats> {
        let url = self.url("/admin/dashboard");
        self.send_json(self.client.get(&url).bearer_auth(token), &url)
            .await
    }

    /// Profile of the account identified by `email`.
    pub async fn profile(&self, email: &str) -> ClientResult<Profile> {
        let url = self.url("/profile");
        self.send_json(self.client.get(&url).header(EMAIL_HEADER, email), &url)
            .await
    }

    /// Replace the profile of the account identified by `email`.
    pub async fn update_profile(&self, email: &str, profile: &Profile) -> ClientResult<()> {
        let url = self.url("/update_profile");
        self.send(
            self.client
                .put(&url)
                .header(EMAIL_HEADER, email)
                .json(profile),
            &url,
        )
        .await?;
        Ok(())
    }

    /// Send a request and turn non-2xx responses into errors.
    async fn send(&self, request: RequestBuilder, url: &str) -> ClientResult<Response> {
        debug!(url, "api request");
        let response = request.send().await.map_err(|e| transport_error(url, e))?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "api response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Send a request and parse the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ClientResult<T> {
        let response = self.send(request, url).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("{}: {}", url, e)))
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        warn!(url, error = %e, "api unreachable");
        ClientError::ConnectionFailed {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        ClientError::Request(e)
    }
}

/// Build an error from a non-2xx response, preferring the server's message.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let path = response.url().path().to_string();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.description().map(str::to_string));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized { message },
        StatusCode::NOT_FOUND => ClientError::NotFound { path, message },
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
