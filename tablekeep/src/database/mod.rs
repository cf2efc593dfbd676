//! Database layer for persistent storage of restaurants, tables and
//! reservations.
//!
//! `SQLite` is the single source of truth. Live reservations on a table can
//! never overlap: the allocator checks inside an IMMEDIATE transaction and
//! triggers reject any write that slips past it.
//!
//! # Examples
//!
//! ```no_run
//! use tablekeep::database::{Database, DatabaseConfig};
//! use tablekeep::RestaurantId;
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/tablekeep.db")).unwrap();
//! let restaurant = RestaurantId::new("r-1").unwrap();
//! for table in Database::list_tables(db.connection(), &restaurant, None).unwrap() {
//!     println!("table {} seats {}", table.table_number, table.number_of_seats);
//! }
//! ```

mod catalog;
mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME, DATA_DIR_ENV,
};
pub use connection::Database;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
