//! Route table and navigator.
//!
//! Routes are static and matched in declaration order; the first match wins.
//! `:name` segments capture exactly one non-empty path segment.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::auth::Role;
use crate::guard::{Access, authorize_route};
use crate::session::Session;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const VERIFY_OTP_PATH: &str = "/verify-otp";
pub const BOOKING_CONFIRMATION_PATH: &str = "/booking-confirmation";

/// Page rendered for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Home,
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
    VerifyOtp,
    Packages,
    BookPackage,
    MyBookings,
    AddPackage,
    HotelBookings,
    Profile,
    AdminDashboard,
    AllBookings,
    BookingConfirmation,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowList {
    /// No guard.
    Public,
    /// Signed-in actors with one of these roles.
    Roles(&'static [Role]),
}

/// A static route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub pattern: &'static str,
    pub allowed: AllowList,
    pub view: View,
}

const fn public(pattern: &'static str, view: View) -> RouteDescriptor {
    RouteDescriptor {
        pattern,
        allowed: AllowList::Public,
        view,
    }
}

const fn guarded(pattern: &'static str, roles: &'static [Role], view: View) -> RouteDescriptor {
    RouteDescriptor {
        pattern,
        allowed: AllowList::Roles(roles),
        view,
    }
}

/// The application's routes.
pub static ROUTES: &[RouteDescriptor] = &[
    public(HOME_PATH, View::Home),
    public(LOGIN_PATH, View::Login),
    public(SIGNUP_PATH, View::Signup),
    public("/forgot-password", View::ForgotPassword),
    public("/reset-password/:token", View::ResetPassword),
    public(VERIFY_OTP_PATH, View::VerifyOtp),
    guarded("/packages", &[Role::User], View::Packages),
    guarded("/book-package/:id", &[Role::User], View::BookPackage),
    guarded("/my-bookings", &[Role::User], View::MyBookings),
    guarded("/add-package", &[Role::HotelOwner], View::AddPackage),
    guarded("/hotel-bookings", &[Role::HotelOwner], View::HotelBookings),
    guarded("/profile", &[Role::User, Role::HotelOwner], View::Profile),
    guarded("/admin-dashboard", &[Role::Admin], View::AdminDashboard),
    guarded("/all-bookings", &[Role::Admin], View::AllBookings),
    public(BOOKING_CONFIRMATION_PATH, View::BookingConfirmation),
];

/// Captured `:name` segments.
pub type Params = BTreeMap<String, String>;

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static RouteDescriptor,
    pub params: Params,
}

/// Ordered set of routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl RouteTable {
    pub fn new(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    /// First route matching `path`, if any.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            match_pattern(route.pattern, &path).map(|params| RouteMatch { route, params })
        })
    }
}

/// Strip query and fragment, force a leading slash, drop a trailing one.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}

fn match_pattern(pattern: &str, path: &str) -> Option<Params> {
    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());
    let mut params = Params::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    params.insert(name.to_string(), actual.to_string());
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Result of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the view.
    Render { view: View, params: Params },
    /// The guard turned the navigation away.
    Redirect { to: &'static str },
    /// No route matches.
    NotFound { path: String },
}

/// Resolves paths and applies the route guard on every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    table: RouteTable,
}

impl Navigator {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn navigate(&self, session: &Session, path: &str) -> Navigation {
        let Some(matched) = self.table.resolve(path) else {
            debug!(path, "no route matches");
            return Navigation::NotFound {
                path: normalize_path(path),
            };
        };

        match authorize_route(session, matched.route) {
            Access::Allow => {
                debug!(path, view = ?matched.route.view, "rendering");
                Navigation::Render {
                    view: matched.route.view,
                    params: matched.params,
                }
            }
            Access::Redirect(to) => {
                debug!(path, to, role = %session.role, "guard redirected navigation");
                Navigation::Redirect { to }
            }
        }
    }
}
