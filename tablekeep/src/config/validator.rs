//! Configuration validation.

use crate::config::schema::{Config, NotificationSettings, ReservationSettings, SchedulerSettings};
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use tablekeep::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::with_defaults()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks every populated field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref reservations) = config.reservations {
            Self::validate_reservations(reservations)?;
        }
        if let Some(ref scheduler) = config.scheduler {
            Self::validate_scheduler(scheduler)?;
        }
        if let Some(ref notifications) = config.notifications {
            Self::validate_notifications(notifications)?;
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_reservations(settings: &ReservationSettings) -> Result<()> {
        if settings.pending_grace_minutes == Some(0) {
            return Err(Error::Validation {
                field: "reservations.pending_grace_minutes".into(),
                message: "Grace period must be greater than 0".into(),
            });
        }
        if settings.reminder_lead_minutes == Some(0) {
            return Err(Error::Validation {
                field: "reservations.reminder_lead_minutes".into(),
                message: "Reminder lead time must be greater than 0".into(),
            });
        }
        if let Some(ref tz) = settings.timezone {
            tz.parse::<chrono_tz::Tz>().map_err(|_| Error::Validation {
                field: "reservations.timezone".into(),
                message: format!("Unknown timezone: '{tz}'"),
            })?;
        }
        Ok(())
    }

    fn validate_scheduler(settings: &SchedulerSettings) -> Result<()> {
        if settings.auto_cancel_interval_seconds == Some(0) {
            return Err(Error::Validation {
                field: "scheduler.auto_cancel_interval_seconds".into(),
                message: "Interval must be greater than 0".into(),
            });
        }
        if settings.reminder_interval_seconds == Some(0) {
            return Err(Error::Validation {
                field: "scheduler.reminder_interval_seconds".into(),
                message: "Interval must be greater than 0".into(),
            });
        }
        Ok(())
    }

    fn validate_notifications(settings: &NotificationSettings) -> Result<()> {
        if let Some(ref brand) = settings.brand_name {
            if brand.trim().is_empty() {
                return Err(Error::Validation {
                    field: "notifications.brand_name".into(),
                    message: "Cannot be empty or only whitespace".into(),
                });
            }
        }
        for (field, base) in [
            ("notifications.cancel_link_base", &settings.cancel_link_base),
            ("notifications.confirm_link_base", &settings.confirm_link_base),
        ] {
            if let Some(base) = base {
                if !(base.starts_with("http://") || base.starts_with("https://")) {
                    return Err(Error::Validation {
                        field: field.into(),
                        message: format!("Must be an http(s) URL, got '{base}'"),
                    });
                }
            }
        }
        Ok(())
    }
}
