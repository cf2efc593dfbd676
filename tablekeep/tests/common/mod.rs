//! Common test utilities for integration tests.
//!
//! Integration tests only see the public API, so the fixtures here build
//! restaurants and requests through it rather than through crate internals.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tablekeep::clock::ManualClock;
use tablekeep::config::ReservationPolicy;
use tablekeep::notification::Notifier;
use tablekeep::{
    ClientId, CreateReservationRequest, Database, DatabaseConfig, ReservationManager, Restaurant,
    RestaurantId, Table, TableId,
};
use tempfile::TempDir;

/// An email captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.subject).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send_email(&self, to: &str, subject: &str, html_body: &str) -> tablekeep::Result<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

/// A database file in a temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the database is used.
#[allow(dead_code)]
pub fn temp_database() -> (TempDir, DatabaseConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("tablekeep.db"));
    (dir, config)
}

/// An instant on 2025-03-01 UTC.
#[allow(dead_code)]
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
}

/// Stores a restaurant with two-hour bookings and the given
/// `(table_number, seats)` tables. Table ids are `{id}-t{number}`.
#[allow(dead_code)]
pub fn seed_restaurant(db: &mut Database, id: &str, tables: &[(u32, u32)]) {
    let restaurant_id = RestaurantId::new(id).unwrap();
    db.upsert_restaurant(&Restaurant {
        id: restaurant_id.clone(),
        name: format!("Restaurant {id}"),
        phone: Some("555-0100".into()),
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

/// A manager over a fresh database with a pinned clock.
#[allow(dead_code)]
pub fn manager_at(
    config: &DatabaseConfig,
    notifier: Arc<RecordingNotifier>,
    now: DateTime<Utc>,
) -> (ReservationManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    let db = Database::open(config.clone()).unwrap();
    let manager = ReservationManager::new(
        db,
        notifier,
        Arc::clone(&clock) as Arc<dyn tablekeep::Clock>,
        ReservationPolicy::default(),
    );
    (manager, clock)
}

/// A booking request for `party_size` guests at `start` with a client email.
#[allow(dead_code)]
pub fn request(restaurant: &str, start: DateTime<Utc>, party_size: u32) -> CreateReservationRequest {
    CreateReservationRequest::new(
        RestaurantId::new(restaurant).unwrap(),
        ClientId::new("client-1").unwrap(),
        start,
        party_size,
    )
    .with_client("Ana", "ana@example.com")
}
