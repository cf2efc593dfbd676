#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tablekeep
//!
//! A library for allocating restaurant tables and managing the lifecycle of
//! reservations.
//!
//! Reservations are stored in `SQLite`. A reservation is created pending,
//! confirmed by the client, confirmed or cancelled by the restaurant, and
//! checked in when the party arrives. Pending reservations nobody confirms
//! are cancelled automatically, and clients get a reminder email shortly
//! before their table is due.
//!
//! ## Core Types
//!
//! - [`ReservationWindow`]: Half-open time interval a table is held for
//! - [`Reservation`] and [`ReservationStatus`]: Reservation records
//! - [`TableAllocator`] and [`AvailabilityChecker`]: Conflict-free table choice
//! - [`ReservationManager`]: Lifecycle transitions and queries
//! - [`ExpiryOperations`] and [`ReminderOperations`]: Time-driven passes
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use tablekeep::ReservationWindow;
//!
//! let six = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
//! let early = ReservationWindow::starting_at(six, Duration::hours(2)).unwrap();
//! let late = ReservationWindow::starting_at(six + Duration::hours(2), Duration::hours(2)).unwrap();
//!
//! // Back-to-back seatings share a table.
//! assert!(!early.overlaps(&late));
//! ```

pub mod allocator;
pub mod availability;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod notification;
pub mod operations;
pub mod query;
pub mod reservation;
pub mod restaurant;
pub mod scheduler;
pub mod window;

// Re-export key types at crate root for convenience
pub use allocator::TableAllocator;
pub use availability::AvailabilityChecker;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigBuilder, ReservationPolicy};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, InvalidStateReason, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use notification::{LogNotifier, Mailer, Notifier};
pub use operations::{CreateReservationRequest, ReservationManager};
pub use query::{Page, ReservationFilter, ReservationStats, SortOrder};
pub use reservation::{Actor, CancelledBy, Reservation, ReservationId, ReservationStatus};
pub use restaurant::{Address, ClientId, Restaurant, RestaurantId, Table, TableId};
pub use scheduler::{
    AutoCancelResult, ExpiryOperations, ReminderOperations, ReminderResult, SchedulerRunner,
};
pub use window::ReservationWindow;
