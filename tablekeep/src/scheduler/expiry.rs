//! Auto-cancellation of reservations left pending past the grace period.
//!
//! Each cancellation is its own conditional write, so a client confirming
//! between the scan and the write keeps the reservation. Once the scan has
//! run, failures are logged per reservation and the pass carries on; only
//! committed cancellations are reported.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::ReservationPolicy;
use crate::database::Database;
use crate::error::Result;
use crate::notification::Mailer;
use crate::reservation::{CancelledBy, Reservation, ReservationId, ReservationStatus};

/// Result of an auto-cancel pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCancelResult {
    /// Number of reservations cancelled (or that would be in dry-run mode).
    pub cancelled_count: usize,
    /// Reservations that were (or would be) cancelled, in their new state.
    pub cancelled_reservations: Vec<Reservation>,
    /// Tables whose advisory `is_reserved` flag changed afterwards.
    pub tables_refreshed: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// The auto-cancel pass.
pub struct ExpiryOperations;

impl ExpiryOperations {
    /// Cancels every pending reservation that started more than the grace
    /// period ago, notifies each affected client, then refreshes the
    /// advisory table flags.
    ///
    /// Running it again right away cancels nothing new.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use tablekeep::clock::SystemClock;
    /// use tablekeep::config::ReservationPolicy;
    /// use tablekeep::database::{Database, DatabaseConfig};
    /// use tablekeep::notification::{LogNotifier, Mailer};
    /// use tablekeep::scheduler::ExpiryOperations;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tablekeep.db")).unwrap();
    /// let policy = ReservationPolicy::default();
    /// let mailer = Mailer::new(Arc::new(LogNotifier), policy.messages.clone());
    ///
    /// let preview = ExpiryOperations::auto_cancel(&mut db, &mailer, &SystemClock, &policy, true).unwrap();
    /// println!("would cancel {} reservations", preview.cancelled_count);
    /// ```
    pub fn auto_cancel(
        db: &mut Database,
        mailer: &Mailer,
        clock: &dyn Clock,
        policy: &ReservationPolicy,
        dry_run: bool,
    ) -> Result<AutoCancelResult> {
        let now = clock.now();
        let cutoff = now - policy.pending_grace;
        let stale = Database::find_stale_pending(db.connection(), cutoff)?;

        if dry_run {
            let preview: Vec<Reservation> =
                stale.into_iter().map(|r| cancelled_by_system(r, now)).collect();
            return Ok(AutoCancelResult {
                cancelled_count: preview.len(),
                cancelled_reservations: preview,
                tables_refreshed: 0,
                dry_run: true,
            });
        }

        let mut cancelled = Vec::new();
        for reservation in stale {
            let won = match cancel_if_pending(db, reservation.id, now) {
                Ok(won) => won,
                Err(e) => {
                    log::warn!("could not auto-cancel reservation {}: {e}", reservation.id);
                    continue;
                }
            };

            if !won {
                log::debug!("reservation {} left pending state first", reservation.id);
                continue;
            }

            let reservation = cancelled_by_system(reservation, now);
            log::info!(
                "auto-cancelled reservation {} (started {}, never confirmed)",
                reservation.id,
                reservation.window.start().format("%Y-%m-%d %H:%M")
            );

            match Database::find_restaurant(db.connection(), &reservation.restaurant_id) {
                Ok(Some(restaurant)) => {
                    mailer.auto_cancelled(&reservation, &restaurant);
                }
                Ok(None) => log::warn!(
                    "restaurant {} not found; no auto-cancel email for {}",
                    reservation.restaurant_id,
                    reservation.id
                ),
                Err(e) => log::warn!("no auto-cancel email for {}: {e}", reservation.id),
            }
            cancelled.push(reservation);
        }

        let tables_refreshed = db.refresh_table_occupancy(now).unwrap_or_else(|e| {
            log::warn!("could not refresh table occupancy: {e}");
            0
        });

        Ok(AutoCancelResult {
            cancelled_count: cancelled.len(),
            cancelled_reservations: cancelled,
            tables_refreshed,
            dry_run: false,
        })
    }
}

fn cancel_if_pending(db: &mut Database, id: ReservationId, now: DateTime<Utc>) -> Result<bool> {
    let tx = db.begin_immediate()?;
    let won = Database::cancel_if_pending_simple(&tx, id, CancelledBy::System, now)?;
    tx.commit()?;
    Ok(won)
}

fn cancelled_by_system(mut reservation: Reservation, now: DateTime<Utc>) -> Reservation {
    reservation.status = ReservationStatus::Cancelled;
    reservation.canceled_by = Some(CancelledBy::System);
    reservation.canceled_at = Some(now);
    reservation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::test_util::{at, create_test_database, seed_restaurant, test_reservation};
    use crate::notification::{MessageSettings, MockNotifier};
    use crate::restaurant::TableId;
    use std::sync::Arc;

    fn mailer_expecting(times: usize) -> Mailer {
        let mut mock = MockNotifier::new();
        mock.expect_send_email()
            .times(times)
            .returning(|_, _, _| Ok(()));
        Mailer::new(Arc::new(mock), MessageSettings::default())
    }

    #[test]
    fn test_grace_boundary() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4)]);
        let stale = test_reservation("r-1", Some("r-1-t1"), at(18, 29), at(20, 0), 2);
        let fresh = test_reservation("r-1", Some("r-1-t2"), at(18, 50), at(20, 0), 2);
        db.create_reservation(&stale).unwrap();
        db.create_reservation(&fresh).unwrap();

        let clock = ManualClock::new(at(19, 0));
        let result = ExpiryOperations::auto_cancel(
            &mut db,
            &mailer_expecting(1),
            &clock,
            &ReservationPolicy::default(),
            false,
        )
        .unwrap();

        assert_eq!(result.cancelled_count, 1);
        let cancelled = Database::get_reservation(db.connection(), stale.id())
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
        assert_eq!(cancelled.canceled_by(), Some(CancelledBy::System));
        assert_eq!(cancelled.canceled_at(), Some(at(19, 0)));

        let untouched = Database::get_reservation(db.connection(), fresh.id())
            .unwrap()
            .unwrap();
        assert_eq!(untouched.status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let stale = test_reservation("r-1", Some("r-1-t1"), at(17, 0), at(19, 0), 2);
        db.create_reservation(&stale).unwrap();

        let clock = ManualClock::new(at(19, 0));
        let result = ExpiryOperations::auto_cancel(
            &mut db,
            &mailer_expecting(0),
            &clock,
            &ReservationPolicy::default(),
            true,
        )
        .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.cancelled_count, 1);
        assert_eq!(
            result.cancelled_reservations[0].canceled_by(),
            Some(CancelledBy::System)
        );
        let stored = Database::get_reservation(db.connection(), stale.id())
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_repeated_pass_is_idempotent_and_skips_confirmed() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4)]);
        let stale = test_reservation("r-1", Some("r-1-t1"), at(17, 0), at(20, 0), 2);
        let mut confirmed = test_reservation("r-1", Some("r-1-t2"), at(17, 0), at(20, 0), 2);
        confirmed.status = ReservationStatus::Confirmed;
        db.create_reservation(&stale).unwrap();
        db.create_reservation(&confirmed).unwrap();

        let clock = ManualClock::new(at(19, 0));
        let policy = ReservationPolicy::default();
        let mailer = mailer_expecting(1);

        let first = ExpiryOperations::auto_cancel(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(first.cancelled_count, 1);
        // Table 2 is occupied by the confirmed booking at 19:00.
        assert_eq!(first.tables_refreshed, 1);

        let second = ExpiryOperations::auto_cancel(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(second.cancelled_count, 0);

        let t2 = Database::find_table(db.connection(), &TableId::new("r-1-t2").unwrap())
            .unwrap()
            .unwrap();
        assert!(t2.is_reserved);
    }

    #[test]
    fn test_lookup_failure_after_commit_keeps_pass_going() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4)]);
        let first = test_reservation("r-1", Some("r-1-t1"), at(17, 0), at(20, 0), 2);
        let second = test_reservation("r-1", Some("r-1-t2"), at(17, 30), at(20, 0), 2);
        db.create_reservation(&first).unwrap();
        db.create_reservation(&second).unwrap();
        db.connection()
            .execute("ALTER TABLE restaurants RENAME TO restaurants_moved", [])
            .unwrap();

        let clock = ManualClock::new(at(19, 0));
        let result = ExpiryOperations::auto_cancel(
            &mut db,
            &mailer_expecting(0),
            &clock,
            &ReservationPolicy::default(),
            false,
        )
        .unwrap();

        assert_eq!(result.cancelled_count, 2);
        for id in [first.id(), second.id()] {
            let stored = Database::get_reservation(db.connection(), id).unwrap().unwrap();
            assert_eq!(stored.status(), ReservationStatus::Cancelled);
        }
    }
}
