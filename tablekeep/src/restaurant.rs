//! Restaurant and table records.
//!
//! These are owned by an external catalog and only read by the engine. The
//! one exception is [`Table::is_reserved`], an advisory flag the scheduler
//! refreshes and nothing relies on for correctness.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank values.
            ///
            /// # Errors
            ///
            /// Returns [`Error::Validation`] if the value is empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(Error::Validation {
                        field: $field.into(),
                        message: "must be non-empty after trimming whitespace".into(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Borrows the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a restaurant in the external catalog.
    RestaurantId,
    "restaurant_id"
);
string_id!(
    /// Identifier of a dining table in the external catalog.
    TableId,
    "table_id"
);
string_id!(
    /// Identifier of the client who booked.
    ClientId,
    "client_id"
);

/// A restaurant, as far as allocation and notifications care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Catalog identifier.
    pub id: RestaurantId,
    /// Display name used in notifications.
    pub name: String,
    /// Contact phone shown in reminders.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address shown in reminders.
    #[serde(default)]
    pub address: Option<Address>,
    /// Maximum length of a reservation in minutes. `None` means a booking
    /// lasts until the end of its local day.
    #[serde(default)]
    pub max_reservation_minutes: Option<u32>,
    /// Capacity hint from the catalog. Not enforced by allocation.
    #[serde(default)]
    pub max_clients: Option<u32>,
}

/// Postal address of a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Address {
    /// Street name.
    pub street: String,
    /// Street number.
    pub number: String,
    /// District or neighbourhood.
    #[serde(default)]
    pub district: String,
    /// City.
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.street, self.number)?;
        for part in [&self.district, &self.city, &self.state] {
            if !part.is_empty() {
                write!(f, " - {part}")?;
            }
        }
        Ok(())
    }
}

/// A dining table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Catalog identifier.
    pub id: TableId,
    /// Restaurant the table belongs to.
    pub restaurant_id: RestaurantId,
    /// Number painted on the table; unique within a restaurant.
    pub table_number: u32,
    /// Seats available.
    pub number_of_seats: u32,
    /// Advisory occupancy flag. Never consulted by allocation.
    #[serde(default)]
    pub is_reserved: bool,
}

impl Table {
    /// Whether the table seats a party of `party_size`.
    #[must_use]
    pub const fn fits(&self, party_size: u32) -> bool {
        self.number_of_seats >= party_size
    }
}
