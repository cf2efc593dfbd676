//! Utility functions for CLI operations.
//!
//! Configuration loading, database and manager construction, and the time
//! parsing and formatting shared by every command.

use crate::error::CliError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tablekeep::clock::{Clock, ManualClock, SystemClock};
use tablekeep::notification::LogNotifier;
use tablekeep::{
    Config, ConfigBuilder, Database, DatabaseConfig, ReservationManager, ReservationPolicy,
};

/// Name of the data directory under the home directory.
const DATA_DIR_NAME: &str = ".tablekeep";

/// Database file inside the data directory.
const DATABASE_FILE: &str = "tablekeep.db";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Pin the current time instead of reading the system clock.
    pub now: Option<DateTime<Utc>>,
}

/// Load hierarchical configuration.
///
/// Sources, highest precedence first: environment variables, project files
/// found from the current directory, the user config in the data directory,
/// then built-in defaults.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the reservation policy from configuration.
pub fn load_policy(config: &Config) -> Result<ReservationPolicy, CliError> {
    ReservationPolicy::from_config(config).map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the data directory: `--data-dir` or `~/.tablekeep`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.clone());
    }

    let home_dir = home::home_dir()
        .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

/// Build the database configuration from global options and config.
pub fn database_config(global: &GlobalOptions, config: &Config) -> Result<DatabaseConfig, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);
    if let Some(timeout_seconds) = global.busy_timeout {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }
    Ok(db_config)
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    Database::open(database_config(global, config)?).map_err(CliError::from)
}

/// The clock commands run against.
pub fn clock(global: &GlobalOptions) -> Arc<dyn Clock> {
    match global.now {
        Some(now) => Arc::new(ManualClock::new(now)),
        None => Arc::new(SystemClock),
    }
}

/// Open a lifecycle manager that delivers notifications to the log.
pub fn open_manager(global: &GlobalOptions, config: &Config) -> Result<ReservationManager, CliError> {
    let policy = load_policy(config)?;
    let db = open_database(global, config)?;
    Ok(ReservationManager::new(
        db,
        Arc::new(LogNotifier),
        clock(global),
        policy,
    ))
}

/// Parse an instant given on the command line.
///
/// Accepts RFC 3339 (`2025-03-01T19:00:00Z`) or a local time
/// (`2025-03-01 19:00`, `2025-03-01T19:00`) in `tz`.
pub fn parse_time(value: &str, tz: Tz) -> Result<DateTime<Utc>, CliError> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let local = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "'{value}' is not a time (expected RFC 3339 or 'YYYY-MM-DD HH:MM')"
            ))
        })?;

    tz.from_local_datetime(&local)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| CliError::InvalidArguments(format!("'{value}' does not exist in {tz}")))
}

/// Clap value parser for `--now`.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

/// Format an instant in `tz` for display.
pub fn format_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}
