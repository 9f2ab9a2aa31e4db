//! Administrator statistics.

use serde::{Deserialize, Serialize};

/// `GET /admin/dashboard` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_hotel_owners: u64,
    pub total_packages: u64,
    pub total_bookings: u64,
}
