//! Plain-text and JSON rendering for the terminal front end.

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use wayfare::flows::bookings::{BookingConfirmation, BookingLedger};
use wayfare::nav::{AuthControls, NavBar};
use wayfare::protocol::{Booking, DashboardStats, Package, Profile};
use wayfare::session::Session;

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serializing output to JSON")?
    );
    Ok(())
}

pub fn nav_bar(bar: &NavBar, current_path: &str) {
    let mut parts: Vec<String> = bar
        .items
        .iter()
        .map(|item| {
            if item.is_active(current_path) {
                format!("[{}]", item.label)
            } else {
                item.label.to_string()
            }
        })
        .collect();
    match bar.controls {
        AuthControls::Logout => parts.push("Logout".to_string()),
        AuthControls::Guest(items) => parts.extend(items.iter().map(|i| i.label.to_string())),
    }
    println!("{}", parts.join(" | "));
    println!();
}

pub fn menu(bar: &NavBar) {
    for item in &bar.items {
        println!("{:<18} {}", item.path, item.label);
    }
    match bar.controls {
        AuthControls::Logout => println!("{:<18} Logout", "(action)"),
        AuthControls::Guest(items) => {
            for item in items {
                println!("{:<18} {}", item.path, item.label);
            }
        }
    }
}

pub fn session(session: &Session) {
    if !session.is_authenticated() {
        println!("Not signed in.");
        return;
    }
    println!("{:<8} {}", "Email:", session.email().unwrap_or("-"));
    println!("{:<8} {} ({})", "Role:", session.role.label(), session.role);
}

fn price(value: f64) -> String {
    format!("${:.2}", value)
}

/// Server dates may carry a time component; show only the day.
fn display_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn packages(packages: &[&Package], sample: bool) {
    if sample {
        println!("(API unavailable, showing sample packages)");
    }
    if packages.is_empty() {
        println!("No packages found.");
        return;
    }

    println!(
        "{:<26} {:<24} {:<18} {:>10}  {}",
        "ID", "TITLE", "DESTINATION", "PRICE", "DURATION"
    );
    for p in packages {
        println!(
            "{:<26} {:<24} {:<18} {:>10}  {}",
            p.id,
            p.title,
            p.destination,
            price(p.price),
            p.duration.as_deref().unwrap_or("-")
        );
    }
}

pub fn package(package: &Package) {
    println!("{}", package.title);
    println!("{:<13} {}", "Destination:", package.destination);
    println!("{:<13} {}", "Price:", price(package.price));
    if let Some(duration) = &package.duration {
        println!("{:<13} {}", "Duration:", duration);
    }
    if let Some(description) = &package.description {
        println!();
        println!("{}", description);
    }
}

pub fn suggestions(matches: &[&Package]) {
    if matches.is_empty() {
        return;
    }
    println!();
    println!("Suggestions:");
    for p in matches {
        println!("  {} ({})", p.title, p.destination);
    }
}

pub fn confirmation(confirmation: &BookingConfirmation) {
    println!("Booking confirmed!");
    println!("{:<13} {}", "Package:", confirmation.title);
    println!("{:<13} {}", "Destination:", confirmation.destination);
    println!("{:<13} {}", "Price:", price(confirmation.price));
    println!("{:<13} {}", "Travel date:", confirmation.travel_date);
}

fn booking_row(booking: &Booking, with_user: bool) {
    let (title, destination, amount) = match &booking.package {
        Some(p) => (
            p.title.as_str(),
            p.destination.as_deref().unwrap_or("-"),
            price(p.price),
        ),
        None => ("(package removed)", "-", "-".to_string()),
    };
    if with_user {
        let traveler = booking.user.as_ref().map_or("-", |u| u.email.as_str());
        println!(
            "{:<26} {:<24} {:<18} {:>10}  {:<12} {}",
            booking.id,
            title,
            destination,
            amount,
            display_date(&booking.travel_date),
            traveler
        );
    } else {
        println!(
            "{:<26} {:<24} {:<18} {:>10}  {}",
            booking.id,
            title,
            destination,
            amount,
            display_date(&booking.travel_date)
        );
    }
}

pub fn my_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("You have no bookings yet.");
        return;
    }
    println!(
        "{:<26} {:<24} {:<18} {:>10}  {}",
        "ID", "PACKAGE", "DESTINATION", "PRICE", "TRAVEL DATE"
    );
    for booking in bookings {
        booking_row(booking, false);
    }
}

pub fn ledger(ledger: &BookingLedger) {
    if ledger.bookings().is_empty() {
        println!("No bookings.");
        return;
    }
    println!(
        "{:<26} {:<24} {:<18} {:>10}  {:<12} {}",
        "ID", "PACKAGE", "DESTINATION", "PRICE", "TRAVEL DATE", "TRAVELER"
    );
    for booking in ledger.bookings() {
        booking_row(booking, true);
        if ledger.expanded() == Some(booking.id.as_str()) {
            if let Some(user) = &booking.user {
                println!("    name: {}", user.name);
                if let Some(hotel) = &user.hotel_name {
                    println!("    hotel: {}", hotel);
                }
                if let Some(location) = &user.hotel_location {
                    println!("    location: {}", location);
                }
            }
        }
    }
}

pub fn dashboard(stats: &DashboardStats, sample: bool) {
    if sample {
        println!("(API unavailable, showing sample statistics)");
    }
    println!("{:<14} {}", "Users:", stats.total_users);
    println!("{:<14} {}", "Hotel owners:", stats.total_hotel_owners);
    println!("{:<14} {}", "Packages:", stats.total_packages);
    println!("{:<14} {}", "Bookings:", stats.total_bookings);
}

pub fn profile(profile: &Profile) {
    let fields = [
        ("Name", &profile.name),
        ("Email", &profile.email),
        ("Role", &profile.role),
        ("Company", &profile.company_name),
        ("Location", &profile.company_location),
        ("LinkedIn", &profile.linkedin),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{:<12} {}", format!("{label}:"), value);
        }
    }
    for (key, value) in &profile.extra {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("{:<12} {}", format!("{key}:"), shown);
    }
}
