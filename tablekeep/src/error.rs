//! Error types for the tablekeep library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! side is the single [`Error`] enum defined here. Lifecycle guards that
//! reject a transition surface as [`Error::InvalidState`] carrying an
//! [`InvalidStateReason`], so callers can branch on the reason without
//! parsing messages.

use std::path::PathBuf;

use thiserror::Error;

use crate::reservation::ReservationId;

/// Result type alias for operations that may fail with a tablekeep error.
///
/// # Examples
///
/// ```
/// use tablekeep::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tablekeep library.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The request cannot be satisfied without double-booking a table.
    #[error("reservation conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// A lifecycle transition was rejected by its guard.
    #[error("reservation {reservation} cannot transition: {reason}")]
    InvalidState {
        /// The reservation the transition was attempted on.
        reservation: ReservationId,
        /// Why the guard rejected it.
        reason: InvalidStateReason,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },

    /// A notification could not be delivered.
    #[error("failed to notify {recipient}: {message}")]
    Notification {
        /// The address the message was meant for.
        recipient: String,
        /// What went wrong.
        message: String,
    },

    /// A background scheduler pass failed outside of the database layer.
    #[error("scheduler error: {message}")]
    Scheduler {
        /// What went wrong.
        message: String,
    },
}

/// Reason a lifecycle transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStateReason {
    /// The restaurant acted on a reservation that has no table yet.
    NoTableAssigned,
    /// The restaurant tried to reconfirm a reservation the client cancelled.
    CancelledByClient,
    /// The reservation is cancelled, which is terminal.
    Cancelled,
    /// Check-in requires a confirmed reservation.
    NotConfirmed,
    /// The party has already checked in.
    AlreadyCheckedIn,
}

impl std::fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTableAssigned => write!(f, "no table assigned"),
            Self::CancelledByClient => write!(f, "cancelled by client"),
            Self::Cancelled => write!(f, "reservation is cancelled"),
            Self::NotConfirmed => write!(f, "reservation is not confirmed"),
            Self::AlreadyCheckedIn => write!(f, "already checked in"),
        }
    }
}

impl Error {
    /// Check if the error means a lookup did not resolve.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablekeep::Error;
    ///
    /// let err = Error::NotFound { resource: "restaurant r-1".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is a booking conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns the guard reason when this is an [`Error::InvalidState`].
    #[must_use]
    pub fn invalid_state_reason(&self) -> Option<InvalidStateReason> {
        match self {
            Self::InvalidState { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check if the error is SQLite reporting that the database stayed locked
    /// past the busy timeout.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
        )
    }
}
