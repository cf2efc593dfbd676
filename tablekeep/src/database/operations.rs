//! Reservation reads and writes.
//!
//! Read helpers are associated functions taking a `&Connection` so they work
//! both on a plain connection and inside a transaction. Methods ending in
//! `_simple` write without opening their own transaction; the others wrap a
//! single statement in an IMMEDIATE transaction.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::query::{Page, ReservationFilter, ReservationStats};
use crate::reservation::{CancelledBy, Reservation, ReservationId, ReservationStatus};
use crate::restaurant::{ClientId, RestaurantId, TableId};
use crate::window::ReservationWindow;

use super::connection::{classify_write_error, Database};
use super::schema::{INSERT_RESERVATION, RESERVATION_COLUMNS, UPDATE_RESERVATION_STATE};

/// Converts an instant to Unix nanoseconds for storage.
///
/// # Errors
///
/// Returns [`Error::Validation`] for instants outside the years 1677..2262.
pub(super) fn to_nanos(instant: DateTime<Utc>) -> Result<i64> {
    instant
        .timestamp_nanos_opt()
        .ok_or_else(|| Error::Validation {
            field: "timestamp".into(),
            message: format!("{instant} is outside the storable range"),
        })
}

/// Converts stored Unix nanoseconds back to an instant.
pub(super) fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

fn conversion_error(e: Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

/// Deserializes a reservation from a row selected with [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: String = row.get(0)?;
    let restaurant_id: String = row.get(1)?;
    let client_id: String = row.get(2)?;
    let table_id: Option<String> = row.get(5)?;
    let start: i64 = row.get(7)?;
    let end: i64 = row.get(8)?;
    let status: String = row.get(10)?;
    let canceled_by: Option<String> = row.get(13)?;
    let canceled_at: Option<i64> = row.get(14)?;
    let checked_in_at: Option<i64> = row.get(17)?;

    let window = ReservationWindow::new(from_nanos(start), from_nanos(end))
        .map_err(conversion_error)?;

    Ok(Reservation {
        id: id.parse().map_err(conversion_error)?,
        restaurant_id: RestaurantId::new(restaurant_id).map_err(conversion_error)?,
        client_id: ClientId::new(client_id).map_err(conversion_error)?,
        client_name: row.get(3)?,
        client_email: row.get(4)?,
        table_id: table_id
            .map(TableId::new)
            .transpose()
            .map_err(conversion_error)?,
        table_number: row.get(6)?,
        window,
        party_size: row.get(9)?,
        status: status.parse().map_err(conversion_error)?,
        client_confirmed: row.get(11)?,
        restaurant_confirmed: row.get(12)?,
        canceled_by: canceled_by
            .map(|s| s.parse::<CancelledBy>())
            .transpose()
            .map_err(conversion_error)?,
        canceled_at: canceled_at.map(from_nanos),
        reminder_sent: row.get(15)?,
        checked_in: row.get(16)?,
        checked_in_at: checked_in_at.map(from_nanos),
        created_at: from_nanos(row.get(18)?),
    })
}

fn select_reservations(
    conn: &Connection,
    where_clause: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Reservation>> {
    let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations {where_clause}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, row_to_reservation)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::from)
}

impl Database {
    /// Inserts a reservation without opening a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the overlap trigger rejects the row,
    /// or a database error otherwise.
    pub fn insert_reservation_simple(conn: &Connection, reservation: &Reservation) -> Result<()> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id.to_string(),
                reservation.restaurant_id.as_str(),
                reservation.client_id.as_str(),
                reservation.client_name,
                reservation.client_email,
                reservation.table_id.as_ref().map(TableId::as_str),
                reservation.table_number,
                to_nanos(reservation.window.start())?,
                to_nanos(reservation.window.end())?,
                reservation.party_size,
                reservation.status.as_str(),
                reservation.client_confirmed,
                reservation.restaurant_confirmed,
                reservation.canceled_by.map(CancelledBy::as_str),
                reservation.canceled_at.map(to_nanos).transpose()?,
                reservation.reminder_sent,
                reservation.checked_in,
                reservation.checked_in_at.map(to_nanos).transpose()?,
                to_nanos(reservation.created_at)?,
            ],
        )
        .map_err(|e| classify_write_error(e, 0))?;
        Ok(())
    }

    /// Inserts a reservation in its own IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if it overlaps a live booking on its
    /// table, [`Error::LockTimeout`] if the write lock is unavailable.
    pub fn create_reservation(&mut self, reservation: &Reservation) -> Result<()> {
        let tx = self.begin_immediate()?;
        Self::insert_reservation_simple(&tx, reservation)?;
        tx.commit()?;
        Ok(())
    }

    /// Fetches a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        conn.query_row(&sql, [id.to_string()], row_to_reservation)
            .optional()
            .map_err(Error::from)
    }

    /// Writes every mutable lifecycle column of `reservation` back.
    ///
    /// Returns `false` if no row with that id exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the overlap trigger rejects the new
    /// assignment.
    pub fn update_reservation_state_simple(
        conn: &Connection,
        reservation: &Reservation,
    ) -> Result<bool> {
        let rows = conn
            .execute(
                UPDATE_RESERVATION_STATE,
                params![
                    reservation.table_id.as_ref().map(TableId::as_str),
                    reservation.table_number,
                    reservation.status.as_str(),
                    reservation.client_confirmed,
                    reservation.restaurant_confirmed,
                    reservation.canceled_by.map(CancelledBy::as_str),
                    reservation.canceled_at.map(to_nanos).transpose()?,
                    reservation.reminder_sent,
                    reservation.checked_in,
                    reservation.checked_in_at.map(to_nanos).transpose()?,
                    reservation.id.to_string(),
                ],
            )
            .map_err(|e| classify_write_error(e, 0))?;
        Ok(rows > 0)
    }

    /// Live reservations on `table_id` whose window overlaps `window`.
    ///
    /// Uses the half-open test `start < window.end AND end > window.start`
    /// and skips `exclude` when given.
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
        select_reservations(
            conn,
            "WHERE table_id = ?1 AND status != 'cancelled'
               AND start_time < ?2 AND end_time > ?3
               AND (?4 IS NULL OR id != ?4)
             ORDER BY start_time",
            params![
                table_id.as_str(),
                to_nanos(window.end())?,
                to_nanos(window.start())?,
                exclude.map(|id| id.to_string()),
            ],
        )
    }

    /// Whether any live reservation on `table_id` overlaps `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_conflict(
        conn: &Connection,
        table_id: &TableId,
        window: &ReservationWindow,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        let found: bool = conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE table_id = ?1 AND status != 'cancelled'
                  AND start_time < ?2 AND end_time > ?3
                  AND (?4 IS NULL OR id != ?4)
             )",
            params![
                table_id.as_str(),
                to_nanos(window.end())?,
                to_nanos(window.start())?,
                exclude.map(|id| id.to_string()),
            ],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Pending reservations that started before `cutoff`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_stale_pending(conn: &Connection, cutoff: DateTime<Utc>) -> Result<Vec<Reservation>> {
        select_reservations(
            conn,
            "WHERE status = 'pending' AND start_time < ? ORDER BY start_time",
            [to_nanos(cutoff)?],
        )
    }

    /// Cancels `id` only if it is still pending.
    ///
    /// Returns `false` when the reservation moved on (for example the
    /// client confirmed between the scan and this write).
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn cancel_if_pending_simple(
        conn: &Connection,
        id: ReservationId,
        by: CancelledBy,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE reservations
             SET status = 'cancelled', canceled_by = ?, canceled_at = ?
             WHERE id = ? AND status = 'pending'",
            params![by.as_str(), to_nanos(at)?, id.to_string()],
        )?;
        Ok(rows > 0)
    }

    /// Live reservations starting in `(after, until]` that have not had a
    /// reminder yet, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_reminders_due(
        conn: &Connection,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Reservation>> {
        select_reservations(
            conn,
            "WHERE reminder_sent = 0 AND status != 'cancelled'
               AND start_time > ? AND start_time <= ?
             ORDER BY start_time",
            [to_nanos(after)?, to_nanos(until)?],
        )
    }

    /// Atomically flips `reminder_sent` from false to true.
    ///
    /// Exactly one caller wins for a given reservation; the rest get `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn claim_reminder(&mut self, id: ReservationId) -> Result<bool> {
        let tx = self.begin_immediate()?;
        let rows = tx.execute(
            "UPDATE reservations SET reminder_sent = 1 WHERE id = ? AND reminder_sent = 0",
            [id.to_string()],
        )?;
        tx.commit()?;
        Ok(rows > 0)
    }

    /// The confirmed reservation at `restaurant_id` for `email` whose
    /// window contains `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_check_in_candidate(
        conn: &Connection,
        restaurant_id: &RestaurantId,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE restaurant_id = ?1 AND client_email = ?2 AND status = 'confirmed'
               AND start_time <= ?3 AND end_time >= ?3
             ORDER BY start_time
             LIMIT 1"
        );
        conn.query_row(
            &sql,
            params![
                restaurant_id.as_str(),
                email.trim().to_lowercase(),
                to_nanos(now)?
            ],
            row_to_reservation,
        )
        .optional()
        .map_err(Error::from)
    }

    /// A client's live reservations at a restaurant whose window contains `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_current_reservations(
        conn: &Connection,
        client_id: &ClientId,
        restaurant_id: &RestaurantId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>> {
        select_reservations(
            conn,
            "WHERE client_id = ?1 AND restaurant_id = ?2 AND status != 'cancelled'
               AND start_time <= ?3 AND end_time >= ?3
             ORDER BY start_time",
            params![client_id.as_str(), restaurant_id.as_str(), to_nanos(now)?],
        )
    }

    /// Lists reservations matching `filter`, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        conn: &Connection,
        filter: &ReservationFilter,
    ) -> Result<Page<Reservation>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(ref restaurant_id) = filter.restaurant_id {
            clauses.push("restaurant_id = ?");
            values.push(Value::Text(restaurant_id.to_string()));
        }
        if let Some(ref client_id) = filter.client_id {
            clauses.push("client_id = ?");
            values.push(Value::Text(client_id.to_string()));
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(from) = filter.starting_from {
            clauses.push("start_time >= ?");
            values.push(Value::Integer(to_nanos(from)?));
        }
        if let Some(before) = filter.starting_before {
            clauses.push("start_time < ?");
            values.push(Value::Integer(to_nanos(before)?));
        }
        if let Some(ref needle) = filter.search {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                clauses.push("(lower(client_name) LIKE ? OR client_email LIKE ?)");
                let pattern = format!("%{needle}%");
                values.push(Value::Text(pattern.clone()));
                values.push(Value::Text(pattern));
            }
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let total_items: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM reservations {where_clause}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let limit = filter.effective_limit();
        let mut page_values = values;
        page_values.push(Value::Integer(i64::from(limit)));
        page_values.push(Value::Integer(
            i64::try_from(filter.offset()).unwrap_or(i64::MAX),
        ));

        let items = select_reservations(
            conn,
            &format!(
                "{where_clause} ORDER BY start_time {order}, created_at DESC LIMIT ? OFFSET ?",
                order = filter.order.as_sql()
            ),
            params_from_iter(page_values.iter()),
        )?;

        Ok(Page {
            items,
            total_items: u64::try_from(total_items).unwrap_or(0),
            page: filter.page.max(1),
            limit,
        })
    }

    /// Counts a restaurant's reservations starting at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn restaurant_stats(
        conn: &Connection,
        restaurant_id: &RestaurantId,
        since: DateTime<Utc>,
    ) -> Result<ReservationStats> {
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(status = 'cancelled'), 0),
                    COALESCE(SUM(status = 'pending'), 0),
                    COALESCE(SUM(status = 'confirmed'), 0),
                    COALESCE(SUM(CASE WHEN status != 'cancelled' THEN party_size ELSE 0 END), 0)
             FROM reservations
             WHERE restaurant_id = ? AND start_time >= ?",
            params![restaurant_id.as_str(), to_nanos(since)?],
            |row| {
                let count = |idx: usize| -> rusqlite::Result<u64> {
                    let value: i64 = row.get(idx)?;
                    Ok(u64::try_from(value).unwrap_or(0))
                };
                Ok(ReservationStats {
                    total: count(0)?,
                    cancelled: count(1)?,
                    pending: count(2)?,
                    confirmed: count(3)?,
                    total_people: count(4)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Live reservations at a restaurant starting in `[from, to]`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn upcoming_reservations(
        conn: &Connection,
        restaurant_id: &RestaurantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Reservation>> {
        select_reservations(
            conn,
            "WHERE restaurant_id = ? AND status IN ('pending', 'confirmed')
               AND start_time >= ? AND start_time <= ?
             ORDER BY start_time
             LIMIT ?",
            params![restaurant_id.as_str(), to_nanos(from)?, to_nanos(to)?, limit],
        )
    }

    /// Counts reservations by status, for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_by_status(conn: &Connection, status: ReservationStatus) -> Result<u64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reservations WHERE status = ?",
            [status.as_str()],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Runs `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}
