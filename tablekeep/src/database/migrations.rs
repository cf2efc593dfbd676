//! Database schema management and migrations.
//!
//! This module handles schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_CLIENT_INDEX, CREATE_DINING_TABLES_TABLE, CREATE_METADATA_TABLE,
    CREATE_OVERLAP_INSERT_TRIGGER, CREATE_OVERLAP_UPDATE_TRIGGER, CREATE_REMINDER_INDEX,
    CREATE_RESERVATIONS_TABLE, CREATE_RESTAURANTS_TABLE, CREATE_RESTAURANT_START_INDEX,
    CREATE_STATUS_START_INDEX, CREATE_TABLE_WINDOW_INDEX, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Creates all tables, indices, triggers and the version row in a single
/// batch. Only call this on a database that has not been initialized.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tablekeep::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 2);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    conn.execute(CREATE_RESTAURANTS_TABLE, [])?;
    conn.execute(CREATE_DINING_TABLES_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;

    conn.execute(CREATE_TABLE_WINDOW_INDEX, [])?;
    conn.execute(CREATE_STATUS_START_INDEX, [])?;
    conn.execute(CREATE_REMINDER_INDEX, [])?;
    conn.execute(CREATE_RESTAURANT_START_INDEX, [])?;
    conn.execute(CREATE_CLIENT_INDEX, [])?;

    conn.execute_batch(CREATE_OVERLAP_INSERT_TRIGGER)?;
    conn.execute_batch(CREATE_OVERLAP_UPDATE_TRIGGER)?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than a missing
/// metadata table or version row (both of which mean version 0).
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::ToSqlConversionFailure(e)) => Err(Error::DatabaseCorruption {
            details: format!("unreadable schema version: {e}"),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// A fresh database is initialized in place. Any other version than
/// [`CURRENT_SCHEMA_VERSION`] is rejected.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] for an older or newer schema,
/// or a database error if initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION.unsigned_abs(),
            found: u32::try_from(version).unwrap_or(0),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_fresh_database_is_version_zero() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_initialize_schema_creates_objects() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let count = |kind: &str, name: &str| -> i64 {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = ? AND name = ?",
                [kind, name],
                |row| row.get(0),
            )
            .unwrap()
        };

        assert_eq!(count("table", "restaurants"), 1);
        assert_eq!(count("table", "dining_tables"), 1);
        assert_eq!(count("table", "reservations"), 1);
        assert_eq!(count("index", "idx_reservations_table_window"), 1);
        assert_eq!(count("trigger", "reservations_no_overlap_insert"), 1);
        assert_eq!(count("trigger", "reservations_no_overlap_update"), 1);
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_compatibility_initializes_once() {
        let conn = create_test_connection();
        check_schema_compatibility(&conn).unwrap();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION + 1])
            .unwrap();

        let err = check_schema_compatibility(&conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion { expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_seconds_precision_schema_rejected() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute(INSERT_SCHEMA_VERSION, [1]).unwrap();

        let err = check_schema_compatibility(&conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion { expected: 2, found: 1 }
        ));
    }

    #[test]
    fn test_garbage_version_is_corruption() {
        let conn = create_test_connection();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('schema_version', 'abc')",
            [],
        )
        .unwrap();

        assert!(matches!(
            get_schema_version(&conn),
            Err(Error::DatabaseCorruption { .. })
        ));
    }
}
