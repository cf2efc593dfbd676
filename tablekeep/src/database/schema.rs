//! Database schema definitions and SQL constants.
//!
//! Timestamps are stored as Unix nanoseconds. Booleans are stored as 0/1.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and checked on every open.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Restaurants imported from the external catalog.
///
/// The address is kept as a YAML blob since the engine only ever renders it.
pub const CREATE_RESTAURANTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restaurants (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        max_reservation_minutes INTEGER,
        max_clients INTEGER
    )";

/// Dining tables imported from the external catalog.
pub const CREATE_DINING_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS dining_tables (
        id TEXT PRIMARY KEY NOT NULL,
        restaurant_id TEXT NOT NULL REFERENCES restaurants(id),
        table_number INTEGER NOT NULL,
        number_of_seats INTEGER NOT NULL CHECK (number_of_seats > 0),
        is_reserved INTEGER NOT NULL DEFAULT 0,
        UNIQUE (restaurant_id, table_number)
    )";

/// Reservations.
///
/// `table_number` is a snapshot taken at assignment so history survives
/// catalog renumbering.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        restaurant_id TEXT NOT NULL,
        client_id TEXT NOT NULL,
        client_name TEXT NOT NULL,
        client_email TEXT NOT NULL,
        table_id TEXT,
        table_number INTEGER,
        start_time INTEGER NOT NULL,
        end_time INTEGER NOT NULL,
        party_size INTEGER NOT NULL CHECK (party_size > 0),
        status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed', 'cancelled')),
        client_confirmed INTEGER NOT NULL DEFAULT 0,
        restaurant_confirmed INTEGER NOT NULL DEFAULT 0,
        canceled_by TEXT CHECK (canceled_by IN ('user', 'restaurant', 'system')),
        canceled_at INTEGER,
        reminder_sent INTEGER NOT NULL DEFAULT 0,
        checked_in INTEGER NOT NULL DEFAULT 0,
        checked_in_at INTEGER,
        created_at INTEGER NOT NULL,
        CHECK (end_time > start_time)
    )";

/// Speeds up per-table conflict lookups.
pub const CREATE_TABLE_WINDOW_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_table_window \
     ON reservations(table_id, start_time, end_time)";

/// Speeds up the auto-cancel scan.
pub const CREATE_STATUS_START_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_status_start \
     ON reservations(status, start_time)";

/// Speeds up the reminder scan.
pub const CREATE_REMINDER_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_reminder \
     ON reservations(reminder_sent, start_time)";

/// Speeds up restaurant listings and stats.
pub const CREATE_RESTAURANT_START_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_restaurant_start \
     ON reservations(restaurant_id, start_time)";

/// Speeds up client listings.
pub const CREATE_CLIENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_client ON reservations(client_id)";

/// Rejects inserting a live reservation over another live one on the same table.
pub const CREATE_OVERLAP_INSERT_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS reservations_no_overlap_insert
    BEFORE INSERT ON reservations
    WHEN NEW.table_id IS NOT NULL AND NEW.status != 'cancelled'
    BEGIN
        SELECT RAISE(ABORT, 'table_window_overlap')
        WHERE EXISTS (
            SELECT 1 FROM reservations
            WHERE table_id = NEW.table_id
              AND status != 'cancelled'
              AND start_time < NEW.end_time
              AND end_time > NEW.start_time
        );
    END";

/// Rejects updates that would make a reservation overlap another live one.
pub const CREATE_OVERLAP_UPDATE_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS reservations_no_overlap_update
    BEFORE UPDATE OF table_id, start_time, end_time, status ON reservations
    WHEN NEW.table_id IS NOT NULL AND NEW.status != 'cancelled'
    BEGIN
        SELECT RAISE(ABORT, 'table_window_overlap')
        WHERE EXISTS (
            SELECT 1 FROM reservations
            WHERE table_id = NEW.table_id
              AND id != NEW.id
              AND status != 'cancelled'
              AND start_time < NEW.end_time
              AND end_time > NEW.start_time
        );
    END";

/// Message raised by the overlap triggers.
pub const OVERLAP_TRIGGER_MESSAGE: &str = "table_window_overlap";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation query, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "id, restaurant_id, client_id, client_name, client_email, \
     table_id, table_number, start_time, end_time, party_size, status, client_confirmed, \
     restaurant_confirmed, canceled_by, canceled_at, reminder_sent, checked_in, checked_in_at, \
     created_at";

/// SQL statement to insert a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (id, restaurant_id, client_id, client_name, client_email, table_id, table_number,
     start_time, end_time, party_size, status, client_confirmed, restaurant_confirmed,
     canceled_by, canceled_at, reminder_sent, checked_in, checked_in_at, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to write back every mutable lifecycle column.
pub const UPDATE_RESERVATION_STATE: &str = r"
    UPDATE reservations
    SET table_id = ?, table_number = ?, status = ?, client_confirmed = ?,
        restaurant_confirmed = ?, canceled_by = ?, canceled_at = ?, reminder_sent = ?,
        checked_in = ?, checked_in_at = ?
    WHERE id = ?
";
