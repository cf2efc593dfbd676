//! HTML bodies for client notifications.
//!
//! Dates and times are rendered in the restaurant's configured timezone as
//! `YYYY-MM-DD` and `HH:MM`.

use std::fmt::Write as _;

use chrono_tz::Tz;

use crate::reservation::Reservation;
use crate::restaurant::Restaurant;

/// A rendered email ready for a [`Notifier`](super::Notifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Values shared by every template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSettings {
    /// Product name shown in headers and footers.
    pub brand_name: String,
    /// Timezone used to render dates and times.
    pub timezone: Tz,
    /// Prefix for client confirmation links; the reservation id is appended.
    pub confirm_link_base: Option<String>,
    /// Prefix for client cancellation links; the reservation id is appended.
    pub cancel_link_base: Option<String>,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            brand_name: "ReservaFácil".into(),
            timezone: chrono_tz::America::Sao_Paulo,
            confirm_link_base: None,
            cancel_link_base: None,
        }
    }
}

impl MessageSettings {
    fn link(base: Option<&String>, reservation: &Reservation) -> Option<String> {
        base.map(|b| format!("{}/{}", b.trim_end_matches('/'), reservation.id()))
    }

    fn date(&self, reservation: &Reservation) -> String {
        reservation
            .window()
            .start()
            .with_timezone(&self.timezone)
            .format("%Y-%m-%d")
            .to_string()
    }

    fn time(&self, reservation: &Reservation) -> String {
        reservation
            .window()
            .start()
            .with_timezone(&self.timezone)
            .format("%H:%M")
            .to_string()
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(settings: &MessageSettings, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{body}\n<p>{brand}</p>\n</body>\n</html>\n",
        title = escape_html(title),
        brand = escape_html(&settings.brand_name),
    )
}

fn details(settings: &MessageSettings, reservation: &Reservation, restaurant: &Restaurant) -> String {
    let mut out = String::from("<ul>\n");
    let _ = writeln!(out, "<li>Restaurant: {}</li>", escape_html(&restaurant.name));
    let _ = writeln!(out, "<li>Date: {}</li>", settings.date(reservation));
    let _ = writeln!(out, "<li>Time: {}</li>", settings.time(reservation));
    let _ = writeln!(out, "<li>Guests: {}</li>", reservation.party_size());
    if let Some(number) = reservation.table_number() {
        let _ = writeln!(out, "<li>Table: {number}</li>");
    }
    out.push_str("</ul>");
    out
}

fn greeting(reservation: &Reservation) -> String {
    if reservation.client_name().is_empty() {
        "<p>Hello,</p>".to_string()
    } else {
        format!("<p>Hello {},</p>", escape_html(reservation.client_name()))
    }
}

/// Sent after a reservation is created, asking the client to confirm.
#[must_use]
pub fn reservation_created(
    settings: &MessageSettings,
    reservation: &Reservation,
    restaurant: &Restaurant,
) -> EmailMessage {
    let mut body = greeting(reservation);
    body.push_str("\n<p>Your reservation was received. Please confirm it to keep your table.</p>\n");
    body.push_str(&details(settings, reservation, restaurant));
    if let Some(link) = MessageSettings::link(settings.confirm_link_base.as_ref(), reservation) {
        let _ = write!(body, "\n<p><a href=\"{}\">Confirm reservation</a></p>", escape_html(&link));
    }
    if let Some(link) = MessageSettings::link(settings.cancel_link_base.as_ref(), reservation) {
        let _ = write!(body, "\n<p><a href=\"{}\">Cancel reservation</a></p>", escape_html(&link));
    }

    EmailMessage {
        to: reservation.client_email().to_string(),
        subject: format!("Reservation received at {}", restaurant.name),
        html_body: page(settings, "Reservation received", &body),
    }
}

/// Sent when the restaurant cancels.
#[must_use]
pub fn cancelled_by_restaurant(
    settings: &MessageSettings,
    reservation: &Reservation,
    restaurant: &Restaurant,
) -> EmailMessage {
    let mut body = greeting(reservation);
    body.push_str("\n<p>The restaurant cancelled your reservation.</p>\n");
    body.push_str(&details(settings, reservation, restaurant));

    EmailMessage {
        to: reservation.client_email().to_string(),
        subject: "Your reservation was cancelled".into(),
        html_body: page(settings, "Reservation cancelled", &body),
    }
}

/// Sent when the auto-cancel pass drops an unconfirmed reservation.
#[must_use]
pub fn auto_cancelled(
    settings: &MessageSettings,
    reservation: &Reservation,
    restaurant: &Restaurant,
) -> EmailMessage {
    let mut body = greeting(reservation);
    body.push_str(
        "\n<p>Your reservation was cancelled because it was not confirmed in time.</p>\n",
    );
    body.push_str(&details(settings, reservation, restaurant));

    EmailMessage {
        to: reservation.client_email().to_string(),
        subject: "Reservation cancelled for lack of confirmation".into(),
        html_body: page(settings, "Reservation cancelled", &body),
    }
}

/// Sent shortly before the reservation starts.
#[must_use]
pub fn reminder(
    settings: &MessageSettings,
    reservation: &Reservation,
    restaurant: &Restaurant,
) -> EmailMessage {
    let mut body = greeting(reservation);
    body.push_str("\n<p>This is a reminder that your reservation starts soon.</p>\n");
    body.push_str(&details(settings, reservation, restaurant));
    if let Some(ref address) = restaurant.address {
        let _ = write!(body, "\n<p>Address: {}</p>", escape_html(&address.to_string()));
    }
    if let Some(ref phone) = restaurant.phone {
        let _ = write!(body, "\n<p>Phone: {}</p>", escape_html(phone));
    }
    if let Some(link) = MessageSettings::link(settings.cancel_link_base.as_ref(), reservation) {
        let _ = write!(
            body,
            "\n<p>Can't make it? <a href=\"{}\">Cancel reservation</a></p>",
            escape_html(&link)
        );
    }

    EmailMessage {
        to: reservation.client_email().to_string(),
        subject: format!("Reminder: your table at {} is coming up", restaurant.name),
        html_body: page(settings, "Reservation reminder", &body),
    }
}
