//! Reservation lifecycle operations.
//!
//! [`ReservationManager`] is the entry point for everything a client or a
//! restaurant does to a reservation: creating it, assigning a table,
//! confirming, cancelling, checking in, and the read-side queries.
//! [`init_database`] prepares a data directory and [`Catalog`] imports the
//! restaurants and tables bookings are made against.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use tablekeep::clock::SystemClock;
//! use tablekeep::config::ReservationPolicy;
//! use tablekeep::database::{Database, DatabaseConfig};
//! use tablekeep::notification::LogNotifier;
//! use tablekeep::operations::{CreateReservationRequest, ReservationManager};
//! use tablekeep::{ClientId, RestaurantId};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/tablekeep.db")).unwrap();
//! let mut manager = ReservationManager::new(
//!     db,
//!     Arc::new(LogNotifier),
//!     Arc::new(SystemClock),
//!     ReservationPolicy::default(),
//! );
//!
//! let request = CreateReservationRequest::new(
//!     RestaurantId::new("r-1").unwrap(),
//!     ClientId::new("client-42").unwrap(),
//!     Utc::now() + Duration::hours(3),
//!     4,
//! )
//! .with_client("Ana", "ana@example.com");
//! let reservation = manager.create_reservation(request).unwrap();
//! println!("table {:?}", reservation.table_id());
//! ```

pub mod init;
pub mod manager;
pub mod seed;

pub use init::{init_database, InitOptions, InitResult};
pub use manager::{CreateReservationRequest, ReservationManager};
pub use seed::{Catalog, SeedResult};
