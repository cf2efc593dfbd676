//! Reservation time windows.
//!
//! A [`ReservationWindow`] is a half-open interval `[start, end)`. Two
//! windows that merely touch (one ends exactly when the next starts) do not
//! overlap, so back-to-back seatings on the same table are allowed.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated half-open time interval.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tablekeep::ReservationWindow;
///
/// let at = |h| Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).unwrap();
/// let dinner = ReservationWindow::new(at(19), at(21)).unwrap();
/// let late = ReservationWindow::new(at(21), at(23)).unwrap();
///
/// assert!(!dinner.overlaps(&late));
/// assert!(ReservationWindow::new(at(21), at(19)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReservationWindow {
    /// Creates a window, rejecting empty or inverted intervals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `end` is not strictly after `start`,
    /// or if either end cannot be stored at nanosecond precision.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        for (field, instant) in [("start_time", start), ("end_time", end)] {
            if instant.timestamp_nanos_opt().is_none() {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("{instant} is outside the storable range"),
                });
            }
        }
        if end <= start {
            return Err(Error::Validation {
                field: "end_time".into(),
                message: format!("end {end} must be after start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a window of the given length starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `length` is not positive.
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Result<Self> {
        Self::new(start, start + length)
    }

    /// Inclusive start of the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the window.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test: `self.start < other.end && other.start < self.end`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `instant` falls within the window, counting both edges.
    ///
    /// Check-in accepts a party arriving at the very end of its slot, so
    /// this is deliberately closed rather than half-open.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for ReservationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_rejects_inverted_and_empty() {
        assert!(ReservationWindow::new(at(21, 0), at(19, 0)).is_err());
        assert!(ReservationWindow::new(at(19, 0), at(19, 0)).is_err());
        assert!(ReservationWindow::starting_at(at(19, 0), Duration::zero()).is_err());
    }

    #[test]
    fn test_rejects_unstorable_instants() {
        let far = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let err = ReservationWindow::new(at(19, 0), far).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "end_time"));
    }

    #[test]
    fn test_overlap_cases() {
        let dinner = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        let inside = ReservationWindow::new(at(19, 30), at(20, 0)).unwrap();
        let straddle = ReservationWindow::new(at(20, 30), at(22, 0)).unwrap();
        let after = ReservationWindow::new(at(21, 0), at(22, 0)).unwrap();
        let before = ReservationWindow::new(at(17, 0), at(19, 0)).unwrap();

        assert!(dinner.overlaps(&inside));
        assert!(dinner.overlaps(&straddle));
        assert!(!dinner.overlaps(&after));
        assert!(!dinner.overlaps(&before));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let dinner = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        assert!(dinner.contains(at(19, 0)));
        assert!(dinner.contains(at(20, 15)));
        assert!(dinner.contains(at(21, 0)));
        assert!(!dinner.contains(at(21, 1)));
        assert!(!dinner.contains(at(18, 59)));
    }

    #[test]
    fn test_duration_and_display() {
        let dinner = ReservationWindow::starting_at(at(19, 0), Duration::minutes(90)).unwrap();
        assert_eq!(dinner.duration(), Duration::minutes(90));
        assert_eq!(dinner.end(), at(20, 30));
        assert_eq!(dinner.to_string(), "[2025-03-01 19:00, 2025-03-01 20:30)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn window_strategy() -> impl Strategy<Value = ReservationWindow> {
        (0i64..10_000, 1i64..600).prop_map(|(offset, len)| {
            let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let start = base + Duration::minutes(offset);
            ReservationWindow::starting_at(start, Duration::minutes(len)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in window_strategy(), b in window_strategy()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn window_overlaps_itself(a in window_strategy()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn adjacent_windows_never_overlap(a in window_strategy(), len in 1i64..600) {
            let next = ReservationWindow::starting_at(a.end(), Duration::minutes(len)).unwrap();
            prop_assert!(!a.overlaps(&next));
            prop_assert!(!next.overlaps(&a));
        }

        #[test]
        fn overlapping_windows_share_an_instant(a in window_strategy(), b in window_strategy()) {
            let latest_start = a.start().max(b.start());
            let shared = a.contains(latest_start) && b.contains(latest_start)
                && latest_start < a.end() && latest_start < b.end();
            prop_assert_eq!(a.overlaps(&b), shared);
        }
    }
}
