//! CLI-specific error types with exit codes.
//!
//! Library errors are wrapped and mapped to the exit codes documented on
//! [`CliError::exit_code`].

use std::fmt;
use tablekeep::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for database lock.
    Timeout,

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (the reservation is in the wrong state)
    /// - 2: Timeout waiting for database lock
    /// - 3: No data directory found
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: Reservation, restaurant or table not found
    /// - 9: Conflict (no table free, or the table is taken)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::InvalidState { .. } => 1,
                LibError::LockTimeout { .. } => 2,
                LibError::DataDirectoryNotFound { .. } => 3,
                LibError::Validation { .. } => 4,
                LibError::Io(_) => 5,
                LibError::Configuration(_) => 7,
                LibError::NotFound { .. } => 8,
                LibError::Conflict { .. } => 9,
                _ => 6,
            },
            CliError::Timeout => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout => write!(f, "Timeout waiting for database lock"),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (run `tablekeep init` or drop --disable-autoinit)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        if matches!(e, LibError::LockTimeout { .. }) {
            CliError::Timeout
        } else {
            CliError::Library(e)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeep::{InvalidStateReason, ReservationId};

    #[test]
    fn test_library_errors_map_to_exit_codes() {
        let invalid = CliError::from(LibError::InvalidState {
            reservation: ReservationId::new(),
            reason: InvalidStateReason::NotConfirmed,
        });
        assert_eq!(invalid.exit_code(), 1);

        let missing = CliError::from(LibError::NotFound {
            resource: "reservation x".into(),
        });
        assert_eq!(missing.exit_code(), 8);

        let conflict = CliError::from(LibError::Conflict {
            details: "full".into(),
        });
        assert_eq!(conflict.exit_code(), 9);

        let timeout = CliError::from(LibError::LockTimeout { seconds: 5 });
        assert!(matches!(timeout, CliError::Timeout));
        assert_eq!(timeout.exit_code(), 2);
    }
}
