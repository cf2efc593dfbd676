//! Reminder emails shortly before a reservation starts.
//!
//! A reminder is claimed with a conditional write before it is sent, so two
//! overlapping passes never both send for the same reservation. A failed
//! send, including one whose restaurant is gone, stays claimed and is not
//! retried.

use crate::clock::Clock;
use crate::config::ReservationPolicy;
use crate::database::Database;
use crate::error::Result;
use crate::notification::Mailer;
use crate::reservation::Reservation;

/// Result of a reminder pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderResult {
    /// Reminders claimed (or that would be in dry-run mode).
    pub sent_count: usize,
    /// Claimed reminders that could not be delivered.
    pub failed_count: usize,
    /// Reservations reminded (or that would be).
    pub reminded: Vec<Reservation>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// The reminder pass.
pub struct ReminderOperations;

impl ReminderOperations {
    /// Reminds every live reservation starting within the lead time that
    /// has not been reminded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub fn send_due(
        db: &mut Database,
        mailer: &Mailer,
        clock: &dyn Clock,
        policy: &ReservationPolicy,
        dry_run: bool,
    ) -> Result<ReminderResult> {
        let now = clock.now();
        let due = Database::find_reminders_due(db.connection(), now, now + policy.reminder_lead)?;

        if dry_run {
            return Ok(ReminderResult {
                sent_count: due.len(),
                failed_count: 0,
                reminded: due,
                dry_run: true,
            });
        }

        let mut reminded = Vec::new();
        let mut failed_count = 0;
        for mut reservation in due {
            match db.claim_reminder(reservation.id) {
                Ok(true) => reservation.reminder_sent = true,
                Ok(false) => {
                    log::debug!("reminder for {} already claimed", reservation.id);
                    continue;
                }
                Err(e) => {
                    log::warn!("could not claim reminder for {}: {e}", reservation.id);
                    continue;
                }
            }

            let restaurant = Database::find_restaurant(db.connection(), &reservation.restaurant_id);
            let delivered = match restaurant {
                Ok(Some(restaurant)) => mailer.reminder(&reservation, &restaurant),
                Ok(None) => {
                    log::warn!(
                        "restaurant {} not found; no reminder sent for {}",
                        reservation.restaurant_id,
                        reservation.id
                    );
                    false
                }
                Err(e) => {
                    log::warn!("no reminder sent for {}: {e}", reservation.id);
                    false
                }
            };

            if delivered {
                log::info!("sent reminder for reservation {}", reservation.id);
            } else {
                failed_count += 1;
            }
            reminded.push(reservation);
        }

        Ok(ReminderResult {
            sent_count: reminded.len(),
            failed_count,
            reminded,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::test_util::{at, create_test_database, seed_restaurant, test_reservation};
    use crate::error::Error;
    use crate::notification::{MessageSettings, MockNotifier};
    use crate::reservation::ReservationStatus;
    use std::sync::Arc;

    #[test]
    fn test_reminder_sent_exactly_once() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let soon = test_reservation("r-1", Some("r-1-t1"), at(19, 20), at(21, 0), 2);
        db.create_reservation(&soon).unwrap();

        let mut mock = MockNotifier::new();
        mock.expect_send_email()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mailer = Mailer::new(Arc::new(mock), MessageSettings::default());
        let clock = ManualClock::new(at(19, 0));
        let policy = ReservationPolicy::default();

        let first = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(first.sent_count, 1);
        assert!(Database::get_reservation(db.connection(), soon.id())
            .unwrap()
            .unwrap()
            .reminder_sent());

        let second = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(second.sent_count, 0);
    }

    #[test]
    fn test_outside_lead_and_cancelled_skipped() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4), (3, 4)]);
        let later = test_reservation("r-1", Some("r-1-t1"), at(19, 45), at(21, 0), 2);
        let past = test_reservation("r-1", Some("r-1-t2"), at(18, 30), at(21, 0), 2);
        let mut cancelled = test_reservation("r-1", Some("r-1-t3"), at(19, 10), at(21, 0), 2);
        cancelled.status = ReservationStatus::Cancelled;
        for r in [&later, &past, &cancelled] {
            db.create_reservation(r).unwrap();
        }

        let mut mock = MockNotifier::new();
        mock.expect_send_email().times(0);
        let mailer = Mailer::new(Arc::new(mock), MessageSettings::default());
        let clock = ManualClock::new(at(19, 0));

        let result =
            ReminderOperations::send_due(&mut db, &mailer, &clock, &ReservationPolicy::default(), false)
                .unwrap();
        assert_eq!(result.sent_count, 0);
    }

    #[test]
    fn test_failed_send_stays_claimed() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let soon = test_reservation("r-1", Some("r-1-t1"), at(19, 20), at(21, 0), 2);
        db.create_reservation(&soon).unwrap();

        let mut mock = MockNotifier::new();
        mock.expect_send_email().times(1).returning(|to, _, _| {
            Err(Error::Notification {
                recipient: to.to_string(),
                message: "mailbox full".into(),
            })
        });
        let mailer = Mailer::new(Arc::new(mock), MessageSettings::default());
        let clock = ManualClock::new(at(19, 0));
        let policy = ReservationPolicy::default();

        let result = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(result.sent_count, 1);
        assert_eq!(result.failed_count, 1);

        let again = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(again.sent_count, 0);
    }

    #[test]
    fn test_dry_run_does_not_claim() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let soon = test_reservation("r-1", Some("r-1-t1"), at(19, 20), at(21, 0), 2);
        db.create_reservation(&soon).unwrap();

        let mut mock = MockNotifier::new();
        mock.expect_send_email().times(0);
        let mailer = Mailer::new(Arc::new(mock), MessageSettings::default());
        let clock = ManualClock::new(at(19, 0));

        let result =
            ReminderOperations::send_due(&mut db, &mailer, &clock, &ReservationPolicy::default(), true)
                .unwrap();
        assert!(result.dry_run);
        assert_eq!(result.sent_count, 1);
        assert!(!Database::get_reservation(db.connection(), soon.id())
            .unwrap()
            .unwrap()
            .reminder_sent());
    }

    #[test]
    fn test_missing_restaurant_is_claimed_not_sent() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let orphan = test_reservation("ghost", None, at(19, 20), at(21, 0), 2);
        db.create_reservation(&orphan).unwrap();

        let mut mock = MockNotifier::new();
        mock.expect_send_email().times(0);
        let mailer = Mailer::new(Arc::new(mock), MessageSettings::default());
        let clock = ManualClock::new(at(19, 0));
        let policy = ReservationPolicy::default();

        let result = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(result.sent_count, 1);
        assert_eq!(result.failed_count, 1);
        assert!(Database::get_reservation(db.connection(), orphan.id())
            .unwrap()
            .unwrap()
            .reminder_sent());

        let again = ReminderOperations::send_due(&mut db, &mailer, &clock, &policy, false).unwrap();
        assert_eq!(again.sent_count, 0);
    }
}
