//! Booking records.

use serde::{Deserialize, Serialize};

/// `POST /bookings` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub package_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub travel_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// A booking with its package (and, for admin listings, its user) populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    /// Null when the package has since been removed.
    #[serde(rename = "packageId", default)]
    pub package: Option<BookedPackage>,
    /// Only populated in admin listings.
    #[serde(rename = "userId", default)]
    pub user: Option<BookingUser>,
    pub travel_date: String,
}

/// Package fields embedded in a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedPackage {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub destination: Option<String>,
    pub price: f64,
}

/// User fields embedded in a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub hotel_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_request_field_names() {
        let request = BookingRequest {
            package_id: "p1".to_string(),
            travel_date: "2026-12-01".to_string(),
            user_email: Some("ada@example.com".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"packageId": "p1", "travelDate": "2026-12-01", "userEmail": "ada@example.com"})
        );
    }

    #[test]
    fn test_booking_with_removed_package() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "packageId": null,
            "travelDate": "2026-12-01"
        }))
        .unwrap();
        assert!(booking.package.is_none());
        assert!(booking.user.is_none());
    }

    #[test]
    fn test_admin_booking_populates_user() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b2",
            "packageId": {"_id": "p1", "title": "Mountain Retreat", "destination": "Himalayas", "price": 800},
            "userId": {"_id": "u1", "name": "Ada", "email": "ada@example.com"},
            "travelDate": "2026-12-01"
        }))
        .unwrap();
        assert_eq!(booking.package.unwrap().title, "Mountain Retreat");
        assert_eq!(booking.user.unwrap().email, "ada@example.com");
    }
}
