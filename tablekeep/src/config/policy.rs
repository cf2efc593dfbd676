//! Resolved runtime settings.

use std::time::Duration as StdDuration;

use chrono::Duration;
use chrono_tz::Tz;

use crate::config::schema::{
    Config, DEFAULT_AUTO_CANCEL_INTERVAL_SECONDS, DEFAULT_BRAND_NAME,
    DEFAULT_PENDING_GRACE_MINUTES, DEFAULT_REMINDER_INTERVAL_SECONDS,
    DEFAULT_REMINDER_LEAD_MINUTES, DEFAULT_TIMEZONE,
};
use crate::error::{Error, Result};
use crate::notification::MessageSettings;

/// The settings the lifecycle manager and scheduler act on, with every
/// optional field filled in and the timezone parsed.
///
/// # Examples
///
/// ```
/// use tablekeep::config::{Config, ReservationPolicy};
///
/// let policy = ReservationPolicy::from_config(&Config::default()).unwrap();
/// assert_eq!(policy.pending_grace, chrono::Duration::minutes(30));
/// assert_eq!(policy.timezone, chrono_tz::America::Sao_Paulo);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPolicy {
    /// How long a reservation may stay pending.
    pub pending_grace: Duration,
    /// How far ahead of the start time reminders go out.
    pub reminder_lead: Duration,
    /// Zone used for local day boundaries and rendered times.
    pub timezone: Tz,
    /// Period of the auto-cancel loop.
    pub auto_cancel_interval: StdDuration,
    /// Period of the reminder loop.
    pub reminder_interval: StdDuration,
    /// Whether the auto-cancel loop runs.
    pub auto_cancel_enabled: bool,
    /// Whether the reminder loop runs.
    pub reminders_enabled: bool,
    /// Template settings for outgoing email.
    pub messages: MessageSettings,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            pending_grace: Duration::minutes(DEFAULT_PENDING_GRACE_MINUTES.into()),
            reminder_lead: Duration::minutes(DEFAULT_REMINDER_LEAD_MINUTES.into()),
            timezone: chrono_tz::America::Sao_Paulo,
            auto_cancel_interval: StdDuration::from_secs(DEFAULT_AUTO_CANCEL_INTERVAL_SECONDS),
            reminder_interval: StdDuration::from_secs(DEFAULT_REMINDER_INTERVAL_SECONDS),
            auto_cancel_enabled: true,
            reminders_enabled: true,
            messages: MessageSettings::default(),
        }
    }
}

impl ReservationPolicy {
    /// Resolves a policy, using built-in defaults for unset fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the timezone is unknown.
    pub fn from_config(config: &Config) -> Result<Self> {
        let reservations = config.reservations.clone().unwrap_or_default();
        let scheduler = config.scheduler.clone().unwrap_or_default();
        let notifications = config.notifications.clone().unwrap_or_default();

        let tz_name = reservations.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        let timezone: Tz = tz_name.parse().map_err(|_| Error::Validation {
            field: "reservations.timezone".into(),
            message: format!("Unknown timezone: '{tz_name}'"),
        })?;

        Ok(Self {
            pending_grace: Duration::minutes(
                reservations
                    .pending_grace_minutes
                    .unwrap_or(DEFAULT_PENDING_GRACE_MINUTES)
                    .into(),
            ),
            reminder_lead: Duration::minutes(
                reservations
                    .reminder_lead_minutes
                    .unwrap_or(DEFAULT_REMINDER_LEAD_MINUTES)
                    .into(),
            ),
            timezone,
            auto_cancel_interval: StdDuration::from_secs(
                scheduler
                    .auto_cancel_interval_seconds
                    .unwrap_or(DEFAULT_AUTO_CANCEL_INTERVAL_SECONDS),
            ),
            reminder_interval: StdDuration::from_secs(
                scheduler
                    .reminder_interval_seconds
                    .unwrap_or(DEFAULT_REMINDER_INTERVAL_SECONDS),
            ),
            auto_cancel_enabled: !scheduler.disable_auto_cancel.unwrap_or(false),
            reminders_enabled: !scheduler.disable_reminders.unwrap_or(false),
            messages: MessageSettings {
                brand_name: notifications
                    .brand_name
                    .unwrap_or_else(|| DEFAULT_BRAND_NAME.to_string()),
                timezone,
                confirm_link_base: notifications.confirm_link_base,
                cancel_link_base: notifications.cancel_link_base,
            },
        })
    }
}
