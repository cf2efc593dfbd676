//! Availability checks for a single table.
//!
//! These are pure reads. They do not stop two writers from booking the same
//! slot on their own, so allocation calls them inside an IMMEDIATE
//! transaction.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::Result;
use crate::reservation::{Reservation, ReservationId};
use crate::restaurant::TableId;
use crate::window::ReservationWindow;

/// Decides whether a table is free for a window.
///
/// Cancelled reservations never block a table; every other status does.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Whether any live reservation on `table_id` overlaps `window`,
    /// ignoring `exclude` (used when re-checking a reservation's own table).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use rusqlite::Connection;
    /// use tablekeep::database::initialize_schema;
    /// use tablekeep::{AvailabilityChecker, ReservationWindow, TableId};
    ///
    /// let conn = Connection::open_in_memory().unwrap();
    /// initialize_schema(&conn).unwrap();
    ///
    /// let window = ReservationWindow::new(
    ///     Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2025, 3, 1, 21, 0, 0).unwrap(),
    /// ).unwrap();
    /// let table = TableId::new("t-1").unwrap();
    /// assert!(!AvailabilityChecker::has_conflict(&conn, &table, &window, None).unwrap());
    /// ```
    pub fn has_conflict(
        conn: &Connection,
        table_id: &TableId,
        window: &ReservationWindow,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        Database::has_conflict(conn, table_id, window, exclude)
    }

    /// The live reservations on `table_id` that overlap `window`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_conflicting_reservations(
        conn: &Connection,
        table_id: &TableId,
        window: &ReservationWindow,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>> {
        let conflicts = Database::find_conflicting_reservations(conn, table_id, window, exclude)?;
        if !conflicts.is_empty() {
            log::debug!(
                "table {table_id} has {} conflicting reservation(s) in {window}",
                conflicts.len()
            );
        }
        Ok(conflicts)
    }
}
