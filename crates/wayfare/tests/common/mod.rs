//! In-process fake of the booking API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wayfare::client::ApiClient;
use wayfare::session::{FileStore, SessionState};

/// Password every account accepts.
pub const PASSWORD: &str = "secret";

/// Email the signup endpoint reports as already registered.
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// Email the signup endpoint refuses with an empty error body.
pub const BARE_ERROR_EMAIL: &str = "bare@example.com";

type ApiError = (StatusCode, Json<Value>);
type Shared = Arc<Mutex<Backend>>;

/// Data held by the fake API. Tests inspect it after driving the client.
#[derive(Debug, Default)]
pub struct Backend {
    pub packages: Vec<Value>,
    pub bookings: Vec<Value>,
    pub profiles: HashMap<String, Value>,
    pub booking_requests: Vec<Value>,
    pub package_requests: Vec<Value>,
    pub signups: Vec<Value>,
}

impl Backend {
    fn seeded() -> Self {
        let packages = vec![
            package("p1", "Beach Getaway", "Maldives", 1200.0),
            package("p2", "Mountain Retreat", "Himalayas", 800.0),
            package("p3", "City Adventure", "New York", 1500.0),
        ];
        let bookings = vec![
            json!({
                "_id": "b1",
                "packageId": {"_id": "p1", "title": "Beach Getaway", "destination": "Maldives", "price": 1200},
                "userId": {"_id": "u1", "name": "Ada", "email": "ada@example.com"},
                "travelDate": "2026-12-01T00:00:00.000Z"
            }),
            json!({
                "_id": "b2",
                "packageId": null,
                "userId": {"_id": "u2", "name": "Grace", "email": "grace@example.com"},
                "travelDate": "2027-01-15T00:00:00.000Z"
            }),
        ];
        let mut profiles = HashMap::new();
        profiles.insert(
            "ada@example.com".to_string(),
            json!({"name": "Ada", "email": "ada@example.com", "role": "user", "passoutYear": "2019"}),
        );

        Self {
            packages,
            bookings,
            profiles,
            ..Default::default()
        }
    }
}

fn package(id: &str, title: &str, destination: &str, price: f64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "destination": destination,
        "price": price,
        "duration": "5 Days / 4 Nights"
    })
}

/// A running fake API. Aborted on drop.
pub struct TestApi {
    pub base_url: String,
    backend: Shared,
    handle: JoinHandle<()>,
}

impl TestApi {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve the fake API on an ephemeral port.
pub async fn spawn_api() -> TestApi {
    let backend: Shared = Arc::new(Mutex::new(Backend::seeded()));
    let app = Router::new()
        .nest("/api", api_routes())
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApi {
        base_url: format!("http://{addr}/api"),
        backend,
        handle,
    }
}

/// Client for a local port nothing listens on.
pub fn unreachable_client() -> ApiClient {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    ApiClient::with_timeout(
        format!("http://127.0.0.1:{port}/api"),
        std::time::Duration::from_secs(2),
    )
    .unwrap()
}

/// Session state backed by a file in `dir`.
pub fn file_session(dir: &std::path::Path) -> SessionState<FileStore> {
    SessionState::new(FileStore::new(dir.join("session.json")))
}

fn api_routes() -> Router<Shared> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/packages", get(list_packages).post(create_package))
        .route("/packages/featured", get(list_packages))
        .route("/packages/{id}", get(get_package))
        .route("/bookings", post(create_booking))
        .route("/bookings/my-bookings", get(my_bookings))
        .route("/bookings/{id}", delete(delete_booking))
        .route("/admin/all-bookings", get(all_bookings))
        .route("/admin/dashboard", get(dashboard))
        .route("/profile", get(get_profile))
        .route("/update_profile", put(update_profile))
}

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

/// Tokens look like `token-<role>`.
fn require_role(headers: &HeaderMap, role: &str) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "No token provided"))?;
    if token.strip_prefix("token-") == Some(role) {
        Ok(())
    } else {
        Err(error(StatusCode::FORBIDDEN, "Access denied"))
    }
}

fn email_header(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("email")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Email header missing"))
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, ApiError> {
    if body["password"] != PASSWORD {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    let role = body["role"].as_str().unwrap_or_default();
    Ok(Json(json!({ "token": format!("token-{role}") })))
}

async fn signup(
    State(backend): State<Shared>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body["email"] == TAKEN_EMAIL {
        return Err(error(StatusCode::CONFLICT, "Email already registered"));
    }
    if body["email"] == BARE_ERROR_EMAIL {
        return Err((StatusCode::BAD_REQUEST, Json(json!({}))));
    }
    backend.lock().unwrap().signups.push(body);
    Ok((StatusCode::CREATED, Json(json!({ "message": "OTP sent to your email" }))))
}

async fn list_packages(State(backend): State<Shared>) -> Json<Value> {
    Json(Value::Array(backend.lock().unwrap().packages.clone()))
}

async fn get_package(
    State(backend): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    backend
        .lock()
        .unwrap()
        .packages
        .iter()
        .find(|p| p["_id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Package not found"))
}

async fn create_package(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_role(&headers, "hotelOwner")?;
    backend.lock().unwrap().package_requests.push(body);
    Ok((StatusCode::CREATED, Json(json!({ "message": "Package created" }))))
}

async fn create_booking(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_role(&headers, "user")?;
    backend.lock().unwrap().booking_requests.push(body);
    Ok((StatusCode::CREATED, Json(json!({ "message": "Booking created" }))))
}

async fn my_bookings(
    State(backend): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_role(&headers, "user")?;
    let mine = backend.lock().unwrap().bookings[..1].to_vec();
    Ok(Json(Value::Array(mine)))
}

async fn all_bookings(
    State(backend): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_role(&headers, "admin")?;
    Ok(Json(Value::Array(backend.lock().unwrap().bookings.clone())))
}

async fn delete_booking(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_role(&headers, "admin")?;
    let mut backend = backend.lock().unwrap();
    let before = backend.bookings.len();
    backend.bookings.retain(|b| b["_id"] != id.as_str());
    if backend.bookings.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Booking not found"));
    }
    Ok(Json(json!({ "message": "Booking deleted" })))
}

async fn dashboard(
    State(backend): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_role(&headers, "admin")?;
    let backend = backend.lock().unwrap();
    Ok(Json(json!({
        "totalUsers": 2,
        "totalHotelOwners": 1,
        "totalPackages": backend.packages.len(),
        "totalBookings": backend.bookings.len(),
    })))
}

async fn get_profile(
    State(backend): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let email = email_header(&headers)?;
    backend
        .lock()
        .unwrap()
        .profiles
        .get(&email)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "User not found"))
}

async fn update_profile(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let email = email_header(&headers)?;
    backend.lock().unwrap().profiles.insert(email, body);
    Ok(Json(json!({ "message": "Profile updated" })))
}
