//! Database connection management.
//!
//! Opens `SQLite` in WAL mode so scheduler passes can read while a request
//! holds the write lock, and funnels every write through IMMEDIATE
//! transactions so allocation sees a stable view of the table's bookings.

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;
use super::schema::OVERLAP_TRIGGER_MESSAGE;

/// A database connection wrapper with configuration.
///
/// Each thread or task owns its own `Database`; connections are not shared.
///
/// # Examples
///
/// ```no_run
/// use tablekeep::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/tablekeep.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// Creates the parent directory when `auto_create` is set, applies the
    /// WAL and busy-timeout pragmas, then initializes or verifies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file cannot be opened
    /// - The parent directory cannot be created
    /// - PRAGMA settings cannot be applied
    /// - The schema version is unsupported
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // journal_mode returns a row, so it can't go through execute_batch
        if !config.read_only {
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.busy_timeout(config.busy_timeout)?;

        if config.read_only {
            let version = super::migrations::get_schema_version(&conn)?;
            if version != super::schema::CURRENT_SCHEMA_VERSION {
                return Err(Error::UnsupportedSchemaVersion {
                    expected: super::schema::CURRENT_SCHEMA_VERSION.unsigned_abs(),
                    found: u32::try_from(version).unwrap_or(0),
                });
            }
        } else {
            super::migrations::check_schema_compatibility(&conn)?;
        }

        log::debug!("opened database at {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// The configuration this connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Begins an IMMEDIATE transaction, taking the write lock up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if another writer holds the lock past
    /// the busy timeout.
    pub fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.config.busy_timeout.as_secs();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| classify_write_error(e, seconds))
    }
}

/// Translates storage-level failures that carry domain meaning.
///
/// The overlap triggers become [`Error::Conflict`] and an exhausted busy
/// wait becomes [`Error::LockTimeout`]. Everything else stays a database
/// error.
pub(crate) fn classify_write_error(err: rusqlite::Error, busy_seconds: u64) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(_, Some(message))
            if message.contains(OVERLAP_TRIGGER_MESSAGE) =>
        {
            Error::Conflict {
                details: "table already booked for that time".into(),
            }
        }
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy
                || e.code == rusqlite::ErrorCode::DatabaseLocked =>
        {
            Error::LockTimeout {
                seconds: busy_seconds,
            }
        }
        _ => Error::Database(err),
    }
}
