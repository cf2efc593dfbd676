//! The reservation lifecycle manager.
//!
//! Each mutation reloads the reservation inside its own IMMEDIATE
//! transaction, checks the transition guard, writes the new state and
//! commits. Notifications go out after the commit and never undo it.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rusqlite::Connection;

use crate::allocator::TableAllocator;
use crate::availability::AvailabilityChecker;
use crate::clock::Clock;
use crate::config::ReservationPolicy;
use crate::database::Database;
use crate::error::{Error, InvalidStateReason, Result};
use crate::notification::{Mailer, Notifier};
use crate::query::{Page, ReservationFilter, ReservationStats};
use crate::reservation::{Actor, CancelledBy, Reservation, ReservationId, ReservationStatus};
use crate::restaurant::{ClientId, Restaurant, RestaurantId, TableId};
use crate::scheduler::{AutoCancelResult, ExpiryOperations, ReminderOperations, ReminderResult};
use crate::window::ReservationWindow;

/// Input for [`ReservationManager::create_reservation`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tablekeep::operations::CreateReservationRequest;
/// use tablekeep::{ClientId, RestaurantId};
///
/// let request = CreateReservationRequest::new(
///     RestaurantId::new("r-1").unwrap(),
///     ClientId::new("c-1").unwrap(),
///     Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap(),
///     4,
/// )
/// .with_client("Ana", "ana@example.com");
/// assert!(request.end.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReservationRequest {
    /// Restaurant to book at.
    pub restaurant_id: RestaurantId,
    /// Client making the booking.
    pub client_id: ClientId,
    /// Client display name.
    pub client_name: String,
    /// Address notifications go to.
    pub client_email: String,
    /// Requested start.
    pub start: DateTime<Utc>,
    /// Requested end; derived from the restaurant when absent.
    pub end: Option<DateTime<Utc>>,
    /// Number of guests.
    pub party_size: u32,
}

impl CreateReservationRequest {
    /// Creates a request with no client contact details and a derived end.
    #[must_use]
    pub fn new(
        restaurant_id: RestaurantId,
        client_id: ClientId,
        start: DateTime<Utc>,
        party_size: u32,
    ) -> Self {
        Self {
            restaurant_id,
            client_id,
            client_name: String::new(),
            client_email: String::new(),
            start,
            end: None,
            party_size,
        }
    }

    /// Sets the client's name and email.
    #[must_use]
    pub fn with_client(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.client_name = name.into();
        self.client_email = email.into();
        self
    }

    /// Sets an explicit end time.
    #[must_use]
    pub const fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }
}

/// Creates reservations and moves them through their lifecycle.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tablekeep::clock::SystemClock;
/// use tablekeep::config::ReservationPolicy;
/// use tablekeep::notification::LogNotifier;
/// use tablekeep::{Actor, Database, DatabaseConfig, ReservationId, ReservationManager};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tablekeep.db")).unwrap();
/// let mut manager = ReservationManager::new(
///     db,
///     Arc::new(LogNotifier),
///     Arc::new(SystemClock),
///     ReservationPolicy::default(),
/// );
///
/// let id: ReservationId = "0b6f6d58-5a4e-4f2e-9a59-2f1f6c2f8c11".parse().unwrap();
/// manager.confirm_reserve(id, Actor::Client).unwrap();
/// ```
pub struct ReservationManager {
    db: Database,
    mailer: Mailer,
    clock: Arc<dyn Clock>,
    policy: ReservationPolicy,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ReservationManager {
    /// Creates a manager over an open database.
    #[must_use]
    pub fn new(
        db: Database,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        policy: ReservationPolicy,
    ) -> Self {
        let mailer = Mailer::new(notifier, policy.messages.clone());
        Self {
            db,
            mailer,
            clock,
            policy,
        }
    }

    /// The underlying database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// The underlying database, for catalog imports.
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// The resolved policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &ReservationPolicy {
        &self.policy
    }

    /// The current instant according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Books the best-fit free table and asks the client to confirm.
    ///
    /// Allocation and insert share one IMMEDIATE transaction. The restaurant
    /// confirmation that follows is a separate commit, then the "created"
    /// email goes out. If that confirmation fails the stored reservation is
    /// returned unconfirmed; a later confirm or the auto-cancel pass settles
    /// it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the restaurant does not exist
    /// - [`Error::Validation`] for a bad window, party size or email
    /// - [`Error::Conflict`] if no table fits the party for that window
    /// - [`Error::LockTimeout`] if the write lock cannot be taken
    pub fn create_reservation(&mut self, request: CreateReservationRequest) -> Result<Reservation> {
        let restaurant = self.require_restaurant(&request.restaurant_id)?;
        let end = match request.end {
            Some(end) => end,
            None => self.default_end(&restaurant, request.start)?,
        };
        let window = ReservationWindow::new(request.start, end)?;

        let mut reservation =
            Reservation::builder(restaurant.id.clone(), request.client_id, window, request.party_size)
                .client_name(request.client_name)
                .client_email(request.client_email)
                .created_at(self.clock.now())
                .build()?;

        let tx = self.db.begin_immediate()?;
        let table = TableAllocator::find_available_table(
            &tx,
            &restaurant.id,
            reservation.party_size,
            &window,
        )?
        .ok_or_else(|| Error::Conflict {
            details: "no table available for requested window/size".into(),
        })?;
        reservation.table_id = Some(table.id.clone());
        reservation.table_number = Some(table.table_number);
        Database::insert_reservation_simple(&tx, &reservation)?;
        tx.commit()?;

        log::info!(
            "created reservation {} at {} table {} for {} guest(s) {window}",
            reservation.id,
            restaurant.id,
            table.table_number,
            reservation.party_size
        );

        let reservation = match self.confirm_reserve(reservation.id, Actor::Restaurant) {
            Ok(confirmed) => confirmed,
            Err(e) => {
                log::warn!(
                    "reservation {} stored but not restaurant-confirmed: {e}",
                    reservation.id
                );
                return Ok(reservation);
            }
        };
        self.mailer.reservation_created(&reservation, &restaurant);
        Ok(reservation)
    }

    /// Moves a reservation onto a specific table.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation or table does not exist
    /// - [`Error::Validation`] if the table belongs to another restaurant
    /// - [`Error::InvalidState`] if the reservation is cancelled
    /// - [`Error::Conflict`] if the table is too small or already booked
    pub fn assign_table(&mut self, id: ReservationId, table_id: &TableId) -> Result<Reservation> {
        let tx = self.db.begin_immediate()?;
        let mut reservation = load(&tx, id)?;
        let table = Database::find_table(&tx, table_id)?.ok_or_else(|| Error::NotFound {
            resource: format!("table {table_id}"),
        })?;

        if table.restaurant_id != reservation.restaurant_id {
            return Err(Error::Validation {
                field: "table_id".into(),
                message: format!(
                    "table {} belongs to {}, not {}",
                    table.id, table.restaurant_id, reservation.restaurant_id
                ),
            });
        }
        if reservation.is_cancelled() {
            return Err(invalid(id, InvalidStateReason::Cancelled));
        }
        if !table.fits(reservation.party_size) {
            return Err(Error::Conflict {
                details: format!(
                    "table {} seats {}, party of {}",
                    table.table_number, table.number_of_seats, reservation.party_size
                ),
            });
        }
        if AvailabilityChecker::has_conflict(&tx, &table.id, &reservation.window, Some(id))? {
            return Err(Error::Conflict {
                details: "table already booked for that time".into(),
            });
        }

        reservation.table_id = Some(table.id.clone());
        reservation.table_number = Some(table.table_number);
        Database::update_reservation_state_simple(&tx, &reservation)?;
        tx.commit()?;

        log::info!("assigned reservation {id} to table {}", table.table_number);
        Ok(reservation)
    }

    /// Records a confirmation from `actor`.
    ///
    /// A restaurant confirmation marks the table as held and waits for the
    /// client; a client confirmation makes the reservation Confirmed.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation does not exist
    /// - [`Error::InvalidState`] with `NoTableAssigned`, `CancelledByClient`
    ///   or `Cancelled` when the guard rejects the transition
    pub fn confirm_reserve(&mut self, id: ReservationId, actor: Actor) -> Result<Reservation> {
        let reservation = self.transition(id, |r, _now| apply_confirm(r, actor))?;
        log::info!("{actor} confirmed reservation {id}");
        Ok(reservation)
    }

    /// Cancels on behalf of `actor`. Restaurant cancellations notify the client.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation does not exist
    /// - [`Error::InvalidState`] with `Cancelled` if already cancelled, or
    ///   `NoTableAssigned` for a restaurant cancelling an unassigned booking
    pub fn cancel_reserve(&mut self, id: ReservationId, actor: Actor) -> Result<Reservation> {
        let reservation = self.transition(id, |r, now| apply_cancel(r, actor, now))?;
        log::info!("{actor} cancelled reservation {id}");

        // The cancellation is committed; lookup failures only cost the email.
        if actor == Actor::Restaurant {
            match Database::find_restaurant(self.db.connection(), &reservation.restaurant_id) {
                Ok(Some(restaurant)) => {
                    self.mailer.cancelled_by_restaurant(&reservation, &restaurant);
                }
                Ok(None) => log::warn!(
                    "restaurant {} vanished; no cancellation email for {id}",
                    reservation.restaurant_id
                ),
                Err(e) => log::warn!("no cancellation email for {id}: {e}"),
            }
        }
        Ok(reservation)
    }

    /// Marks a confirmed party as arrived.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation does not exist
    /// - [`Error::InvalidState`] with `NotConfirmed` or `AlreadyCheckedIn`
    pub fn check_in_reserve(&mut self, id: ReservationId) -> Result<Reservation> {
        let reservation = self.transition(id, apply_check_in)?;
        log::info!("checked in reservation {id}");
        Ok(reservation)
    }

    /// Checks in the confirmed reservation for `email` at `restaurant_id`
    /// whose window contains the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such reservation exists, otherwise
    /// the same errors as [`check_in_reserve`](Self::check_in_reserve).
    pub fn check_in_by_email(
        &mut self,
        restaurant_id: &RestaurantId,
        email: &str,
    ) -> Result<Reservation> {
        let now = self.clock.now();
        let candidate =
            Database::find_check_in_candidate(self.db.connection(), restaurant_id, email, now)?
                .ok_or_else(|| Error::NotFound {
                    resource: format!("current confirmed reservation for {email} at {restaurant_id}"),
                })?;
        self.check_in_reserve(candidate.id)
    }

    /// Live reservations on `table_id` overlapping `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_conflicting_reservations(
        &self,
        table_id: &TableId,
        window: &ReservationWindow,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>> {
        AvailabilityChecker::find_conflicting_reservations(
            self.db.connection(),
            table_id,
            window,
            exclude,
        )
    }

    /// Looks up one reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Database::get_reservation(self.db.connection(), id)
    }

    /// One page of reservations matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(&self, filter: &ReservationFilter) -> Result<Page<Reservation>> {
        Database::list_reservations(self.db.connection(), filter)
    }

    /// Status counts and head count for reservations starting at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown restaurant.
    pub fn restaurant_stats(
        &self,
        restaurant_id: &RestaurantId,
        since: DateTime<Utc>,
    ) -> Result<ReservationStats> {
        self.require_restaurant(restaurant_id)?;
        Database::restaurant_stats(self.db.connection(), restaurant_id, since)
    }

    /// Pending and confirmed reservations starting in `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn upcoming_reservations(
        &self,
        restaurant_id: &RestaurantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Reservation>> {
        Database::upcoming_reservations(self.db.connection(), restaurant_id, from, to, limit)
    }

    /// The client's live reservations at a restaurant that are underway now.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn current_reservations(
        &self,
        client_id: &ClientId,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Reservation>> {
        Database::find_current_reservations(
            self.db.connection(),
            client_id,
            restaurant_id,
            self.clock.now(),
        )
    }

    /// The current local day in the configured timezone, as `[midnight, next midnight)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the day has no representable midnight.
    pub fn today(&self) -> Result<ReservationWindow> {
        let tz = self.policy.timezone;
        let date = self.clock.now().with_timezone(&tz).date_naive();
        let midnight = |d: chrono::NaiveDate| {
            tz.from_local_datetime(&d.and_time(NaiveTime::MIN))
                .earliest()
                .map(|t| t.with_timezone(&Utc))
                .ok_or_else(|| Error::Validation {
                    field: "timezone".into(),
                    message: format!("no midnight on {d} in {tz}"),
                })
        };
        let next = date.succ_opt().ok_or_else(|| Error::Validation {
            field: "date".into(),
            message: format!("{date} has no successor"),
        })?;
        ReservationWindow::new(midnight(date)?, midnight(next)?)
    }

    /// Runs one auto-cancel pass on this manager's connection.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub fn run_auto_cancel(&mut self, dry_run: bool) -> Result<AutoCancelResult> {
        ExpiryOperations::auto_cancel(
            &mut self.db,
            &self.mailer,
            self.clock.as_ref(),
            &self.policy,
            dry_run,
        )
    }

    /// Runs one reminder pass on this manager's connection.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub fn run_reminders(&mut self, dry_run: bool) -> Result<ReminderResult> {
        ReminderOperations::send_due(
            &mut self.db,
            &self.mailer,
            self.clock.as_ref(),
            &self.policy,
            dry_run,
        )
    }

    fn require_restaurant(&self, id: &RestaurantId) -> Result<Restaurant> {
        Database::find_restaurant(self.db.connection(), id)?.ok_or_else(|| Error::NotFound {
            resource: format!("restaurant {id}"),
        })
    }

    /// `start + max_reservation_minutes`, or 23:59:59 local time on the
    /// start's day when the restaurant sets no maximum.
    fn default_end(&self, restaurant: &Restaurant, start: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(minutes) = restaurant.max_reservation_minutes {
            return Ok(start + Duration::minutes(minutes.into()));
        }

        let tz = self.policy.timezone;
        let local_day = start.with_timezone(&tz).date_naive();
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        tz.from_local_datetime(&local_day.and_time(last_second))
            .latest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| Error::Validation {
                field: "end_time".into(),
                message: format!("cannot derive end of day {local_day} in {tz}"),
            })
    }

    fn transition<F>(&mut self, id: ReservationId, apply: F) -> Result<Reservation>
    where
        F: FnOnce(&mut Reservation, DateTime<Utc>) -> Result<()>,
    {
        let now = self.clock.now();
        let tx = self.db.begin_immediate()?;
        let mut reservation = load(&tx, id)?;
        apply(&mut reservation, now)?;
        Database::update_reservation_state_simple(&tx, &reservation)?;
        tx.commit()?;
        Ok(reservation)
    }
}

fn load(conn: &Connection, id: ReservationId) -> Result<Reservation> {
    Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
        resource: format!("reservation {id}"),
    })
}

const fn invalid(id: ReservationId, reason: InvalidStateReason) -> Error {
    Error::InvalidState {
        reservation: id,
        reason,
    }
}

fn apply_confirm(r: &mut Reservation, actor: Actor) -> Result<()> {
    match actor {
        Actor::Restaurant => {
            if r.table_id.is_none() {
                return Err(invalid(r.id, InvalidStateReason::NoTableAssigned));
            }
            if r.canceled_by == Some(CancelledBy::User) {
                return Err(invalid(r.id, InvalidStateReason::CancelledByClient));
            }
            if r.is_cancelled() {
                return Err(invalid(r.id, InvalidStateReason::Cancelled));
            }
            r.restaurant_confirmed = true;
            r.client_confirmed = false;
            r.status = ReservationStatus::Pending;
            r.canceled_by = None;
            r.canceled_at = None;
        }
        Actor::Client => {
            if r.is_cancelled() {
                return Err(invalid(r.id, InvalidStateReason::Cancelled));
            }
            r.client_confirmed = true;
            r.status = ReservationStatus::Confirmed;
        }
    }
    Ok(())
}

fn apply_cancel(r: &mut Reservation, actor: Actor, now: DateTime<Utc>) -> Result<()> {
    if r.is_cancelled() {
        return Err(invalid(r.id, InvalidStateReason::Cancelled));
    }
    match actor {
        Actor::Restaurant => {
            if r.table_id.is_none() {
                return Err(invalid(r.id, InvalidStateReason::NoTableAssigned));
            }
            r.restaurant_confirmed = false;
            r.canceled_by = Some(CancelledBy::Restaurant);
        }
        Actor::Client => {
            r.client_confirmed = false;
            r.canceled_by = Some(CancelledBy::User);
        }
    }
    r.status = ReservationStatus::Cancelled;
    r.canceled_at = Some(now);
    Ok(())
}

fn apply_check_in(r: &mut Reservation, now: DateTime<Utc>) -> Result<()> {
    if r.status != ReservationStatus::Confirmed {
        return Err(invalid(r.id, InvalidStateReason::NotConfirmed));
    }
    if r.checked_in {
        return Err(invalid(r.id, InvalidStateReason::AlreadyCheckedIn));
    }
    r.checked_in = true;
    r.checked_in_at = Some(now);
    Ok(())
}
