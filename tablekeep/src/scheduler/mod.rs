//! Time-driven passes over the reservation store.
//!
//! [`ExpiryOperations`] cancels reservations nobody confirmed in time and
//! [`ReminderOperations`] emails clients shortly before they are due. Both
//! can be run once (the `expire` and `remind` commands) or periodically via
//! [`SchedulerRunner`].

pub mod expiry;
pub mod reminder;
pub mod runner;

pub use expiry::{AutoCancelResult, ExpiryOperations};
pub use reminder::{ReminderOperations, ReminderResult};
pub use runner::{Pass, SchedulerHandle, SchedulerRunner};
