//! Navigation composer.
//!
//! The menu is the common entries followed by the entries for the current
//! role. Role sets are disjoint from each other and from the common set, so
//! no deduplication is needed.

use serde::Serialize;

use crate::auth::Role;
use crate::routes::{HOME_PATH, LOGIN_PATH, SIGNUP_PATH};
use crate::session::Session;

/// One navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

impl NavItem {
    const fn new(path: &'static str, label: &'static str) -> Self {
        Self { path, label }
    }

    /// Whether this link is the active one for `current_path`.
    ///
    /// The home link is only active on `/` itself; other links are also
    /// active on their sub-paths.
    pub fn is_active(&self, current_path: &str) -> bool {
        if self.path == HOME_PATH {
            return current_path == HOME_PATH;
        }
        current_path == self.path
            || current_path
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

const COMMON_ITEMS: &[NavItem] = &[NavItem::new(HOME_PATH, "Home")];

const USER_ITEMS: &[NavItem] = &[
    NavItem::new("/packages", "Packages"),
    NavItem::new("/my-bookings", "My Bookings"),
];

const HOTEL_OWNER_ITEMS: &[NavItem] = &[
    NavItem::new("/add-package", "Add Package"),
    NavItem::new("/hotel-bookings", "Hotel Bookings"),
];

const ADMIN_ITEMS: &[NavItem] = &[
    NavItem::new("/admin-dashboard", "Dashboard"),
    NavItem::new("/all-bookings", "All Bookings"),
];

const LOGIN_ITEM: NavItem = NavItem::new(LOGIN_PATH, "Login");
const SIGNUP_ITEM: NavItem = NavItem::new(SIGNUP_PATH, "Signup");

fn role_items(role: Role) -> &'static [NavItem] {
    match role {
        Role::User => USER_ITEMS,
        Role::HotelOwner => HOTEL_OWNER_ITEMS,
        Role::Admin => ADMIN_ITEMS,
        Role::Anonymous => &[],
    }
}

/// Ordered menu entries visible to `role`.
pub fn compose_menu(role: Role) -> Vec<NavItem> {
    COMMON_ITEMS
        .iter()
        .chain(role_items(role))
        .copied()
        .collect()
}

/// Trailing authentication control of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum AuthControls {
    /// Signed in: offer logout.
    Logout,
    /// Signed out: offer login then signup.
    Guest([NavItem; 2]),
}

/// `Logout` iff the session carries a non-empty token.
pub fn auth_controls(session: &Session) -> AuthControls {
    if session.is_authenticated() {
        AuthControls::Logout
    } else {
        AuthControls::Guest([LOGIN_ITEM, SIGNUP_ITEM])
    }
}

/// Everything the navigation bar shows for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavBar {
    pub items: Vec<NavItem>,
    pub controls: AuthControls,
}

impl NavBar {
    pub fn compose(session: &Session) -> Self {
        Self {
            items: compose_menu(session.role),
            controls: auth_controls(session),
        }
    }
}
