//! Client notifications.
//!
//! Delivery goes through the [`Notifier`] trait so the engine never talks
//! to a mail server directly. Sends are fire-and-forget: a failure is
//! logged and the state change that triggered it stands.

pub mod templates;

use std::sync::Arc;

use crate::error::Result;
use crate::reservation::Reservation;
use crate::restaurant::Restaurant;

pub use templates::{EmailMessage, MessageSettings};

/// Sends one email.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Delivers an HTML email to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Notification`](crate::Error::Notification) if the
    /// message could not be handed off.
    fn send_email(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// A notifier that writes each message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_email(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        log::info!("email to {to}: {subject}");
        log::debug!("{html_body}");
        Ok(())
    }
}

/// Renders templates and hands them to a [`Notifier`].
#[derive(Clone)]
pub struct Mailer {
    notifier: Arc<dyn Notifier>,
    settings: MessageSettings,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    /// Creates a mailer.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, settings: MessageSettings) -> Self {
        Self { notifier, settings }
    }

    /// The template settings in use.
    #[must_use]
    pub fn settings(&self) -> &MessageSettings {
        &self.settings
    }

    /// Sends `message`, returning whether it was accepted. Failures are
    /// logged and never retried.
    pub fn deliver(&self, message: &EmailMessage) -> bool {
        if message.to.is_empty() {
            log::debug!("skipping \"{}\": reservation has no email", message.subject);
            return false;
        }
        match self
            .notifier
            .send_email(&message.to, &message.subject, &message.html_body)
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to send \"{}\" to {}: {e}", message.subject, message.to);
                false
            }
        }
    }

    /// Asks the client to confirm a new reservation.
    pub fn reservation_created(&self, reservation: &Reservation, restaurant: &Restaurant) -> bool {
        self.deliver(&templates::reservation_created(
            &self.settings,
            reservation,
            restaurant,
        ))
    }

    /// Tells the client the restaurant cancelled.
    pub fn cancelled_by_restaurant(
        &self,
        reservation: &Reservation,
        restaurant: &Restaurant,
    ) -> bool {
        self.deliver(&templates::cancelled_by_restaurant(
            &self.settings,
            reservation,
            restaurant,
        ))
    }

    /// Tells the client an unconfirmed reservation was dropped.
    pub fn auto_cancelled(&self, reservation: &Reservation, restaurant: &Restaurant) -> bool {
        self.deliver(&templates::auto_cancelled(
            &self.settings,
            reservation,
            restaurant,
        ))
    }

    /// Reminds the client the reservation is coming up.
    pub fn reminder(&self, reservation: &Reservation, restaurant: &Restaurant) -> bool {
        self.deliver(&templates::reminder(&self.settings, reservation, restaurant))
    }
}
