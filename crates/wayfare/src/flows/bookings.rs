//! Booking a package and managing bookings.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use wayfare_protocol::{Booking, BookingRequest, Package};

use super::{FlowError, FlowResult, require_token};
use crate::client::ApiClient;
use crate::session::Session;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Prompt shown before an administrator deletes a booking.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this booking?";

/// Parse a travel date typed as `YYYY-MM-DD`.
pub fn parse_travel_date(raw: &str) -> FlowResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| FlowError::Invalid(format!("Invalid travel date: {} (expected YYYY-MM-DD)", raw)))
}

/// Summary shown after a successful booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub title: String,
    pub destination: String,
    pub price: f64,
    pub travel_date: NaiveDate,
}

impl BookingConfirmation {
    pub fn new(package: &Package, travel_date: NaiveDate) -> Self {
        Self {
            title: package.title.clone(),
            destination: package.destination.clone(),
            price: package.price,
            travel_date,
        }
    }
}

/// Book `package_id` for `travel_date` as the signed-in traveler.
pub async fn book_package(
    client: &ApiClient,
    session: &Session,
    package_id: &str,
    travel_date: &str,
) -> FlowResult<BookingConfirmation> {
    let token = require_token(session)?;
    let date = parse_travel_date(travel_date)?;
    let package = client.get_package(package_id).await?;

    let request = BookingRequest {
        package_id: package.id.clone(),
        travel_date: date.format(DATE_FORMAT).to_string(),
        user_email: session.email().map(str::to_string),
    };
    client.create_booking(token, &request).await.map_err(|e| {
        warn!(package_id, error = %e, "booking failed");
        let message = e.server_message().unwrap_or("Booking failed").to_string();
        FlowError::rejected(message, e)
    })?;

    info!(package_id, travel_date = %date, "package booked");
    Ok(BookingConfirmation::new(&package, date))
}

/// Bookings of the signed-in traveler.
pub async fn my_bookings(client: &ApiClient, session: &Session) -> FlowResult<Vec<Booking>> {
    let token = require_token(session)?;
    Ok(client.my_bookings(token).await?)
}

/// Every booking, wrapped for the administrator's list view.
pub async fn all_bookings(client: &ApiClient, session: &Session) -> FlowResult<BookingLedger> {
    let token = require_token(session)?;
    Ok(BookingLedger::new(client.all_bookings(token).await?))
}

/// Administrator's booking list with at most one expanded row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    expanded: Option<String>,
}

impl BookingLedger {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self {
            bookings,
            expanded: None,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Expand the row for `id`, or collapse it if it is already expanded.
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    /// Drop `id` from the list and collapse any expanded row.
    pub fn remove(&mut self, id: &str) -> Option<Booking> {
        self.expanded = None;
        let index = self.bookings.iter().position(|b| b.id == id)?;
        Some(self.bookings.remove(index))
    }

    /// Delete `id` through the API, then remove it locally.
    ///
    /// Only rows in the list can be deleted. The list is left untouched when
    /// the API refuses.
    pub async fn delete(&mut self, client: &ApiClient, session: &Session, id: &str) -> FlowResult<()> {
        let token = require_token(session)?;
        if !self.bookings.iter().any(|b| b.id == id) {
            return Err(FlowError::Invalid(format!("No booking with id {}", id)));
        }
        client.delete_booking(token, id).await.map_err(|e| {
            warn!(booking_id = id, error = %e, "failed to delete booking");
            FlowError::rejected("Failed to delete booking", e)
        })?;
        self.remove(id);
        info!(booking_id = id, "booking deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str) -> Booking {
        Booking {
            id: id.to_string(),
            package: None,
            user: None,
            travel_date: "2026-12-01".to_string(),
        }
    }

    #[test]
    fn test_parse_travel_date() {
        assert_eq!(
            parse_travel_date("2026-12-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
        assert!(parse_travel_date("2026-02-30").is_err());
        assert!(parse_travel_date("01/12/2026").is_err());
    }

    #[test]
    fn test_ledger_toggle() {
        let mut ledger = BookingLedger::new(vec![booking("a"), booking("b")]);
        ledger.toggle("a");
        assert_eq!(ledger.expanded(), Some("a"));
        ledger.toggle("b");
        assert_eq!(ledger.expanded(), Some("b"));
        ledger.toggle("b");
        assert_eq!(ledger.expanded(), None);
    }

    #[test]
    fn test_ledger_remove_collapses() {
        let mut ledger = BookingLedger::new(vec![booking("a"), booking("b")]);
        ledger.toggle("a");
        let removed = ledger.remove("b").unwrap();

        assert_eq!(removed.id, "b");
        assert_eq!(ledger.bookings().len(), 1);
        assert_eq!(ledger.expanded(), None);
        assert!(ledger.remove("missing").is_none());
    }

    #[tokio::test]
    async fn test_ledger_delete_unlisted_id_makes_no_request() {
        // Unroutable base URL: the test fails if a request is attempted.
        let client = ApiClient::new("http://invalid.invalid/api").unwrap();
        let session = Session::new("token-admin", crate::auth::Role::Admin, None);
        let mut ledger = BookingLedger::new(vec![booking("a")]);

        let err = ledger
            .delete(&client, &session, "../packages/p1")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Invalid(ref m) if m == "No booking with id ../packages/p1"));
        assert_eq!(ledger.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_book_without_session_redirects() {
        let client = ApiClient::new("http://invalid.invalid/api").unwrap();
        let err = book_package(&client, &Session::anonymous(), "p1", "2026-12-01")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Redirect("/login")));
    }
}
