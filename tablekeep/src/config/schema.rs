//! Configuration schema definitions.
//!
//! Every field is optional so partial files can be layered; the built-in
//! defaults live in [`Config::with_defaults`].

use serde::{Deserialize, Serialize};

/// Default minutes a reservation may stay pending after creation.
pub const DEFAULT_PENDING_GRACE_MINUTES: u32 = 30;
/// Default minutes before the start time that reminders go out.
pub const DEFAULT_REMINDER_LEAD_MINUTES: u32 = 30;
/// Default IANA timezone for rendering dates and local day boundaries.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
/// Default seconds between auto-cancel passes.
pub const DEFAULT_AUTO_CANCEL_INTERVAL_SECONDS: u64 = 120;
/// Default seconds between reminder passes.
pub const DEFAULT_REMINDER_INTERVAL_SECONDS: u64 = 60;
/// Default brand shown in notifications.
pub const DEFAULT_BRAND_NAME: &str = "ReservaFácil";

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use tablekeep::config::{Config, ReservationSettings};
///
/// let config = Config {
///     reservations: Some(ReservationSettings {
///         pending_grace_minutes: Some(15),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert!(config.scheduler.is_none());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Lifecycle timing and locale.
    pub reservations: Option<ReservationSettings>,

    /// Background pass intervals and switches.
    pub scheduler: Option<SchedulerSettings>,

    /// Notification rendering.
    pub notifications: Option<NotificationSettings>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The built-in defaults, with every field populated.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            reservations: Some(ReservationSettings {
                pending_grace_minutes: Some(DEFAULT_PENDING_GRACE_MINUTES),
                reminder_lead_minutes: Some(DEFAULT_REMINDER_LEAD_MINUTES),
                timezone: Some(DEFAULT_TIMEZONE.to_string()),
            }),
            scheduler: Some(SchedulerSettings {
                auto_cancel_interval_seconds: Some(DEFAULT_AUTO_CANCEL_INTERVAL_SECONDS),
                reminder_interval_seconds: Some(DEFAULT_REMINDER_INTERVAL_SECONDS),
                disable_auto_cancel: Some(false),
                disable_reminders: Some(false),
            }),
            notifications: Some(NotificationSettings {
                brand_name: Some(DEFAULT_BRAND_NAME.to_string()),
                cancel_link_base: None,
                confirm_link_base: None,
            }),
            maximum_lock_wait_seconds: Some(5),
            disable_autoinit: Some(false),
            output_format: Some(OutputFormat::Table),
        }
    }
}

/// Lifecycle timing and locale.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReservationSettings {
    /// Minutes a reservation may stay pending before auto-cancel.
    pub pending_grace_minutes: Option<u32>,

    /// Minutes before the start time that a reminder is sent.
    pub reminder_lead_minutes: Option<u32>,

    /// IANA timezone name, e.g. `America/Sao_Paulo`.
    pub timezone: Option<String>,
}

/// Background pass intervals and switches.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSettings {
    /// Seconds between auto-cancel passes.
    pub auto_cancel_interval_seconds: Option<u64>,

    /// Seconds between reminder passes.
    pub reminder_interval_seconds: Option<u64>,

    /// Skip the auto-cancel loop.
    pub disable_auto_cancel: Option<bool>,

    /// Skip the reminder loop.
    pub disable_reminders: Option<bool>,
}

/// Notification rendering.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
    /// Product name shown in messages.
    pub brand_name: Option<String>,

    /// Prefix of the client cancellation link.
    pub cancel_link_base: Option<String>,

    /// Prefix of the client confirmation link.
    pub confirm_link_base: Option<String>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use tablekeep::config::OutputFormat;
///
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_empty() {
        let config = Config::default();
        assert!(config.reservations.is_none());
        assert!(config.output_format.is_none());
    }

    #[test]
    fn test_defaults_are_complete() {
        let config = Config::with_defaults();
        let reservations = config.reservations.unwrap();
        assert_eq!(reservations.pending_grace_minutes, Some(30));
        assert_eq!(reservations.reminder_lead_minutes, Some(30));
        assert_eq!(reservations.timezone.as_deref(), Some("America/Sao_Paulo"));

        let scheduler = config.scheduler.unwrap();
        assert_eq!(scheduler.auto_cancel_interval_seconds, Some(120));
        assert_eq!(scheduler.reminder_interval_seconds, Some(60));
    }

    #[test]
    fn test_config_deny_unknown_fields() {
        let yaml = "reservations:\n  pending_grace_minutes: 10\n  grace: 5\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_complete_config() {
        let yaml = r"
maximum_lock_wait_seconds: 3
disable_autoinit: true
output_format: json
reservations:
  pending_grace_minutes: 45
  reminder_lead_minutes: 20
  timezone: Europe/Lisbon
scheduler:
  auto_cancel_interval_seconds: 30
  reminder_interval_seconds: 15
  disable_auto_cancel: false
  disable_reminders: true
notifications:
  brand_name: Mesa
  cancel_link_base: https://example.com/cancel
  confirm_link_base: https://example.com/confirm
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert_eq!(
            config.reservations.unwrap().timezone.as_deref(),
            Some("Europe/Lisbon")
        );
        assert_eq!(config.scheduler.unwrap().disable_reminders, Some(true));
        assert_eq!(
            config.notifications.unwrap().brand_name.as_deref(),
            Some("Mesa")
        );
    }

    #[test]
    fn test_output_format_serde() {
        let format: OutputFormat = serde_yaml::from_str("tsv").unwrap();
        assert_eq!(format, OutputFormat::Tsv);
        assert!(serde_yaml::to_string(&format).unwrap().contains("tsv"));
    }
}
