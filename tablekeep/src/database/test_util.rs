//! Shared test utilities for database unit tests.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::Reservation;
use crate::restaurant::{ClientId, Restaurant, RestaurantId, Table, TableId};
use crate::window::ReservationWindow;

/// Creates a temporary test database that lives for the rest of the test run.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// An instant on the fixed test day, 2025-03-01, in UTC.
#[must_use]
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
}

/// Stores restaurant `id` and one table per `(table_number, seats)` pair.
/// Table ids are `{id}-t{table_number}`.
///
/// # Panics
///
/// Panics if any write fails.
pub fn seed_restaurant(db: &mut Database, id: &str, tables: &[(u32, u32)]) {
    let restaurant_id = RestaurantId::new(id).unwrap();
    db.upsert_restaurant(&Restaurant {
        id: restaurant_id.clone(),
        name: format!("Restaurant {id}"),
        phone: None,
        address: None,
        max_reservation_minutes: Some(120),
        max_clients: None,
    })
    .unwrap();

    for &(table_number, seats) in tables {
        db.upsert_table(&Table {
            id: TableId::new(format!("{id}-t{table_number}")).unwrap(),
            restaurant_id: restaurant_id.clone(),
            table_number,
            number_of_seats: seats,
            is_reserved: false,
        })
        .unwrap();
    }
}

/// A pending reservation for "Test Client", optionally already on a table.
///
/// # Panics
///
/// Panics if the window or reservation is invalid.
#[must_use]
pub fn test_reservation(
    restaurant: &str,
    table: Option<&str>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    party_size: u32,
) -> Reservation {
    let mut reservation = Reservation::builder(
        RestaurantId::new(restaurant).unwrap(),
        ClientId::new("client-1").unwrap(),
        ReservationWindow::new(start, end).unwrap(),
        party_size,
    )
    .client_name("Test Client")
    .client_email("test@example.com")
    .created_at(at(9, 0))
    .build()
    .unwrap();

    if let Some(table) = table {
        reservation.table_id = Some(TableId::new(table).unwrap());
        reservation.table_number = table
            .rsplit("-t")
            .next()
            .and_then(|n| n.parse().ok());
    }
    reservation
}
