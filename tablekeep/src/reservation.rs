//! Reservation records and their lifecycle vocabulary.
//!
//! A [`Reservation`] is read-only outside the crate: every state change goes
//! through [`ReservationManager`](crate::operations::ReservationManager) or
//! the scheduler, which apply the transition guards and persist the result.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::restaurant::{ClientId, RestaurantId, TableId};
use crate::window::ReservationWindow;

/// Unique identifier of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ReservationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| Error::Validation {
                field: "reservation_id".into(),
                message: format!("invalid reservation id '{s}': {e}"),
            })
    }
}

/// Where a reservation stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Waiting for the client to confirm.
    Pending,
    /// Confirmed by the client.
    Confirmed,
    /// Terminal.
    Cancelled,
}

impl ReservationStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(Error::Validation {
                field: "status".into(),
                message: format!("unknown reservation status '{s}'"),
            }),
        }
    }
}

/// Who cancelled a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    /// The client who booked.
    User,
    /// Restaurant staff.
    Restaurant,
    /// The auto-cancel pass.
    System,
}

impl CancelledBy {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Restaurant => "restaurant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancelledBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "restaurant" => Ok(Self::Restaurant),
            "system" => Ok(Self::System),
            _ => Err(Error::Validation {
                field: "canceled_by".into(),
                message: format!("unknown cancelling actor '{s}'"),
            }),
        }
    }
}

/// A party that can confirm or cancel a reservation by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The client who booked.
    Client,
    /// Restaurant staff.
    Restaurant,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Restaurant => f.write_str("restaurant"),
        }
    }
}

impl FromStr for Actor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "client" | "user" => Ok(Self::Client),
            "restaurant" => Ok(Self::Restaurant),
            _ => Err(Error::Validation {
                field: "actor".into(),
                message: format!("expected 'client' or 'restaurant', got '{s}'"),
            }),
        }
    }
}

/// A table booking and its lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub(crate) id: ReservationId,
    pub(crate) restaurant_id: RestaurantId,
    pub(crate) client_id: ClientId,
    pub(crate) client_name: String,
    pub(crate) client_email: String,
    pub(crate) table_id: Option<TableId>,
    pub(crate) table_number: Option<u32>,
    pub(crate) window: ReservationWindow,
    pub(crate) party_size: u32,
    pub(crate) status: ReservationStatus,
    pub(crate) client_confirmed: bool,
    pub(crate) restaurant_confirmed: bool,
    pub(crate) canceled_by: Option<CancelledBy>,
    pub(crate) canceled_at: Option<DateTime<Utc>>,
    pub(crate) reminder_sent: bool,
    pub(crate) checked_in: bool,
    pub(crate) checked_in_at: Option<DateTime<Utc>>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Reservation {
    /// Starts building a new pending reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use tablekeep::{ClientId, Reservation, ReservationStatus, ReservationWindow, RestaurantId};
    ///
    /// let window = ReservationWindow::new(
    ///     Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2025, 3, 1, 21, 0, 0).unwrap(),
    /// ).unwrap();
    ///
    /// let reservation = Reservation::builder(
    ///     RestaurantId::new("r-1").unwrap(),
    ///     ClientId::new("c-1").unwrap(),
    ///     window,
    ///     4,
    /// )
    /// .client_name("Ana")
    /// .client_email("ana@example.com")
    /// .build()
    /// .unwrap();
    ///
    /// assert_eq!(reservation.status(), ReservationStatus::Pending);
    /// assert!(reservation.table_id().is_none());
    /// ```
    #[must_use]
    pub fn builder(
        restaurant_id: RestaurantId,
        client_id: ClientId,
        window: ReservationWindow,
        party_size: u32,
    ) -> ReservationBuilder {
        ReservationBuilder {
            restaurant_id,
            client_id,
            window,
            party_size,
            id: None,
            client_name: String::new(),
            client_email: String::new(),
            created_at: None,
        }
    }

    /// Reservation identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Restaurant the booking is for.
    #[must_use]
    pub const fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }

    /// Client who booked.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Client display name.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Address notifications go to.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Assigned table, if any.
    #[must_use]
    pub const fn table_id(&self) -> Option<&TableId> {
        self.table_id.as_ref()
    }

    /// Table number captured at assignment time.
    #[must_use]
    pub const fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    /// The booked interval.
    #[must_use]
    pub const fn window(&self) -> ReservationWindow {
        self.window
    }

    /// Number of guests.
    #[must_use]
    pub const fn party_size(&self) -> u32 {
        self.party_size
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Whether the client confirmed.
    #[must_use]
    pub const fn client_confirmed(&self) -> bool {
        self.client_confirmed
    }

    /// Whether the restaurant confirmed the assignment.
    #[must_use]
    pub const fn restaurant_confirmed(&self) -> bool {
        self.restaurant_confirmed
    }

    /// Who cancelled, when cancelled.
    #[must_use]
    pub const fn canceled_by(&self) -> Option<CancelledBy> {
        self.canceled_by
    }

    /// When the reservation was cancelled.
    #[must_use]
    pub const fn canceled_at(&self) -> Option<DateTime<Utc>> {
        self.canceled_at
    }

    /// Whether the pre-arrival reminder went out.
    #[must_use]
    pub const fn reminder_sent(&self) -> bool {
        self.reminder_sent
    }

    /// Whether the party has checked in.
    #[must_use]
    pub const fn checked_in(&self) -> bool {
        self.checked_in
    }

    /// When the party checked in.
    #[must_use]
    pub const fn checked_in_at(&self) -> Option<DateTime<Utc>> {
        self.checked_in_at
    }

    /// When the reservation was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Shorthand for `status() == Cancelled`.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }
}

/// Builder for a fresh reservation. Lifecycle fields always start pending,
/// unassigned and unconfirmed.
#[derive(Debug)]
pub struct ReservationBuilder {
    restaurant_id: RestaurantId,
    client_id: ClientId,
    window: ReservationWindow,
    party_size: u32,
    id: Option<ReservationId>,
    client_name: String,
    client_email: String,
    created_at: Option<DateTime<Utc>>,
}

impl ReservationBuilder {
    /// Uses a caller-chosen identifier instead of a random one.
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the client's display name.
    #[must_use]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into().trim().to_string();
        self
    }

    /// Sets the client's email address.
    #[must_use]
    pub fn client_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = email.into().trim().to_lowercase();
        self
    }

    /// Sets the creation timestamp (defaults to now).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Validates and builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the party size is zero or the email
    /// is malformed.
    pub fn build(self) -> Result<Reservation> {
        if self.party_size == 0 {
            return Err(Error::Validation {
                field: "party_size".into(),
                message: "must be at least 1".into(),
            });
        }

        if !self.client_email.is_empty() && !self.client_email.contains('@') {
            return Err(Error::Validation {
                field: "client_email".into(),
                message: format!("'{}' is not an email address", self.client_email),
            });
        }

        Ok(Reservation {
            id: self.id.unwrap_or_default(),
            restaurant_id: self.restaurant_id,
            client_id: self.client_id,
            client_name: self.client_name,
            client_email: self.client_email,
            table_id: None,
            table_number: None,
            window: self.window,
            party_size: self.party_size,
            status: ReservationStatus::Pending,
            client_confirmed: false,
            restaurant_confirmed: false,
            canceled_by: None,
            canceled_at: None,
            reminder_sent: false,
            checked_in: false,
            checked_in_at: None,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> ReservationWindow {
        ReservationWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 21, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn builder(party_size: u32) -> ReservationBuilder {
        Reservation::builder(
            RestaurantId::new("r-1").unwrap(),
            ClientId::new("c-1").unwrap(),
            window(),
            party_size,
        )
    }

    #[test]
    fn test_new_reservation_defaults() {
        let reservation = builder(2).client_email("Ana@Example.com ").build().unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(reservation.client_email(), "ana@example.com");
        assert!(!reservation.client_confirmed());
        assert!(!reservation.restaurant_confirmed());
        assert!(!reservation.reminder_sent());
        assert!(!reservation.checked_in());
        assert!(reservation.canceled_by().is_none());
    }

    #[test]
    fn test_zero_party_rejected() {
        let err = builder(0).build().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "party_size"));
    }

    #[test]
    fn test_bad_email_rejected() {
        assert!(builder(2).client_email("not-an-email").build().is_err());
    }

    #[test]
    fn test_status_round_trip_through_storage_form() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert_eq!(
            "Canceled".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Cancelled
        );
        assert!("seated".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_actor_parse() {
        assert_eq!("client".parse::<Actor>().unwrap(), Actor::Client);
        assert_eq!("RESTAURANT".parse::<Actor>().unwrap(), Actor::Restaurant);
        assert!("system".parse::<Actor>().is_err());
    }

    #[test]
    fn test_reservation_id_parse() {
        let id = ReservationId::new();
        assert_eq!(id.to_string().parse::<ReservationId>().unwrap(), id);
        assert!("nope".parse::<ReservationId>().is_err());
    }

    #[test]
    fn test_reservation_serialization() {
        let reservation = builder(3).client_name("Bo").build().unwrap();
        let json = serde_json::to_string(&reservation).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        let back: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reservation);
    }
}
