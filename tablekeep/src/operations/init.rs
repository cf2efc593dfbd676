//! Data directory and database initialization.

use std::fs;
use std::path::PathBuf;

use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// Options for [`init_database`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a commented `config.yaml` beside the database.
    pub create_config: bool,
}

impl InitOptions {
    /// Options for `data_dir` that neither overwrite nor write a config.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing database is replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a default configuration file is written.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What [`init_database`] did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory did not exist and was created.
    pub data_dir_created: bool,
    /// A database was created (or recreated).
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// The initialized data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# tablekeep configuration

# reservations:
#   pending_grace_minutes: 30     # auto-cancel pending bookings this long after start
#   reminder_lead_minutes: 30     # remind clients this long before start
#   timezone: America/Sao_Paulo   # local day boundaries and email times

# scheduler:
#   auto_cancel_interval_seconds: 120
#   reminder_interval_seconds: 60
#   disable_auto_cancel: false
#   disable_reminders: false

# notifications:
#   brand_name: ReservaFácil
#   confirm_link_base: https://example.com/reservations/confirm
#   cancel_link_base: https://example.com/reservations/cancel

maximum_lock_wait_seconds: 5
";

/// Creates the data directory and an empty database, and optionally a
/// commented configuration file.
///
/// An existing configuration file is never overwritten.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the database exists and `overwrite` is
/// off, or an I/O or database error if creation fails.
///
/// # Examples
///
/// ```no_run
/// use tablekeep::operations::init::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/tablekeep")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "Database already exists at {}. Use --overwrite to replace it.",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
        for suffix in ["-wal", "-shm"] {
            let sidecar = PathBuf::from(format!("{}{suffix}", db_path.display()));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("initialized database at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join("config.yaml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("tablekeep");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn test_template_parses_as_config() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions::new(temp.path().to_path_buf()).with_create_config(true);

        let result = init_database(&options).unwrap();
        assert!(result.config_created);

        let config = ConfigLoader::load_file(&temp.path().join("config.yaml")).unwrap();
        assert!(config.reservations.is_none());
        assert_eq!(config.maximum_lock_wait_seconds, Some(5));
    }

    #[test]
    fn test_existing_database_needs_overwrite() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().to_path_buf();
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        match init_database(&InitOptions::new(data_dir.clone())) {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "database");
                assert!(message.contains("--overwrite"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let result =
            init_database(&InitOptions::new(data_dir).with_overwrite(true)).unwrap();
        assert!(result.database_created);
    }

    #[test]
    fn test_existing_config_is_kept() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        fs::write(&config_path, "maximum_lock_wait_seconds: 9\n").unwrap();

        let options = InitOptions::new(temp.path().to_path_buf()).with_create_config(true);
        let result = init_database(&options).unwrap();

        assert!(!result.config_created);
        assert_eq!(
            fs::read_to_string(config_path).unwrap(),
            "maximum_lock_wait_seconds: 9\n"
        );
    }
}
