//! Database location and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// File name of the reservation database inside a data directory.
pub const DATABASE_FILE_NAME: &str = "tablekeep.db";

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "TABLEKEEP_DATA_DIR";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use tablekeep::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/tablekeep.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert_eq!(config.busy_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a writer waits on a locked database before giving up.
    pub busy_timeout: Duration,
    /// Create the file and its parent directory when missing.
    pub auto_create: bool,
    /// Open without write access.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second busy timeout, auto-create on,
    /// and read-write access.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Creates a configuration for the database file inside `data_dir`.
    #[must_use]
    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(DATABASE_FILE_NAME))
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Enables or disables creating a missing database.
    #[must_use]
    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create && !self.read_only;
        self
    }

    /// Opens the database read-only. Implies no auto-create.
    ///
    /// ```
    /// use tablekeep::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/tablekeep.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.tablekeep`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "Cannot determine home directory".into(),
    })?;
    Ok(home.join(".tablekeep"))
}

/// Resolves the database path.
///
/// Uses `$TABLEKEEP_DATA_DIR/tablekeep.db` when the variable is set and
/// `~/.tablekeep/tablekeep.db` otherwise.
///
/// # Errors
///
/// Returns an error if the home directory is needed but cannot be found.
pub fn resolve_database_path() -> Result<PathBuf> {
    let data_dir = match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => default_data_dir()?,
    };
    Ok(data_dir.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_defaults() {
        let config = DatabaseConfig::new("/tmp/test.db");
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.auto_create);
        assert!(!config.read_only);
    }

    #[test]
    fn test_in_data_dir() {
        let config = DatabaseConfig::in_data_dir("/srv/tables");
        assert_eq!(config.path, PathBuf::from("/srv/tables/tablekeep.db"));
    }

    #[test]
    fn test_read_only_blocks_auto_create() {
        let config = DatabaseConfig::new("/tmp/test.db")
            .read_only()
            .with_auto_create(true);
        assert!(config.read_only);
        assert!(!config.auto_create);
    }

    #[test]
    #[serial]
    fn test_resolve_database_path() {
        std::env::set_var(DATA_DIR_ENV, "/custom/data");
        let path = resolve_database_path().unwrap();
        assert_eq!(path, PathBuf::from("/custom/data/tablekeep.db"));

        std::env::remove_var(DATA_DIR_ENV);
        if std::env::var("HOME").is_ok() || std::env::var("USERPROFILE").is_ok() {
            let path = resolve_database_path().unwrap();
            assert!(path.ends_with(".tablekeep/tablekeep.db"));
        }
    }
}
