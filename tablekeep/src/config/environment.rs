//! `TABLEKEEP_*` environment variable overrides.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Applies environment overrides on top of file configuration.
///
/// # Examples
///
/// ```no_run
/// use tablekeep::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Reads every recognized `TABLEKEEP_*` variable into `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable if a value cannot
    /// be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(minutes) = Self::number("TABLEKEEP_PENDING_GRACE_MINUTES")? {
            config
                .reservations
                .get_or_insert_with(Default::default)
                .pending_grace_minutes = Some(minutes);
        }
        if let Some(minutes) = Self::number("TABLEKEEP_REMINDER_LEAD_MINUTES")? {
            config
                .reservations
                .get_or_insert_with(Default::default)
                .reminder_lead_minutes = Some(minutes);
        }
        if let Ok(tz) = env::var("TABLEKEEP_TIMEZONE") {
            config.reservations.get_or_insert_with(Default::default).timezone = Some(tz);
        }

        Self::apply_scheduler_overrides(config)?;

        if let Ok(base) = env::var("TABLEKEEP_CANCEL_LINK_BASE") {
            config
                .notifications
                .get_or_insert_with(Default::default)
                .cancel_link_base = Some(base);
        }
        if let Ok(base) = env::var("TABLEKEEP_CONFIRM_LINK_BASE") {
            config
                .notifications
                .get_or_insert_with(Default::default)
                .confirm_link_base = Some(base);
        }

        if let Some(seconds) = Self::number("TABLEKEEP_MAXIMUM_LOCK_WAIT_SECONDS")? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }
        if let Ok(val) = env::var("TABLEKEEP_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("TABLEKEEP_DISABLE_AUTOINIT", &val)?);
        }

        Ok(())
    }

    fn apply_scheduler_overrides(config: &mut Config) -> Result<()> {
        let mut scheduler = config.scheduler.clone().unwrap_or_default();
        let mut modified = false;

        if let Some(seconds) = Self::number("TABLEKEEP_AUTO_CANCEL_INTERVAL_SECONDS")? {
            scheduler.auto_cancel_interval_seconds = Some(seconds);
            modified = true;
        }
        if let Some(seconds) = Self::number("TABLEKEEP_REMINDER_INTERVAL_SECONDS")? {
            scheduler.reminder_interval_seconds = Some(seconds);
            modified = true;
        }
        if let Ok(val) = env::var("TABLEKEEP_DISABLE_AUTO_CANCEL") {
            scheduler.disable_auto_cancel =
                Some(Self::parse_bool("TABLEKEEP_DISABLE_AUTO_CANCEL", &val)?);
            modified = true;
        }
        if let Ok(val) = env::var("TABLEKEEP_DISABLE_REMINDERS") {
            scheduler.disable_reminders =
                Some(Self::parse_bool("TABLEKEEP_DISABLE_REMINDERS", &val)?);
            modified = true;
        }

        if modified {
            config.scheduler = Some(scheduler);
        }
        Ok(())
    }

    fn number<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(value) => value.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: name.into(),
                message: format!("Must be a non-negative integer, got '{value}'"),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitive.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
