//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, NotificationSettings, ReservationSettings, SchedulerSettings};

/// Merges configuration layers.
///
/// # Examples
///
/// ```
/// use tablekeep::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

macro_rules! overwrite {
    ($target:expr, $source:expr, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field.clone_from(&$source.$field);
            }
        )+
    };
}

impl ConfigMerger {
    /// Merges sources given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    /// Nested sections merge field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        overwrite!(
            target,
            source,
            maximum_lock_wait_seconds,
            disable_autoinit,
            output_format
        );

        if let Some(ref src) = source.reservations {
            let dst = target.reservations.get_or_insert_with(ReservationSettings::default);
            overwrite!(dst, src, pending_grace_minutes, reminder_lead_minutes, timezone);
        }

        if let Some(ref src) = source.scheduler {
            let dst = target.scheduler.get_or_insert_with(SchedulerSettings::default);
            overwrite!(
                dst,
                src,
                auto_cancel_interval_seconds,
                reminder_interval_seconds,
                disable_auto_cancel,
                disable_reminders
            );
        }

        if let Some(ref src) = source.notifications {
            let dst = target
                .notifications
                .get_or_insert_with(NotificationSettings::default);
            overwrite!(dst, src, brand_name, cancel_link_base, confirm_link_base);
        }
    }
}
