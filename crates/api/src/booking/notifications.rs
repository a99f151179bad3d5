//! Composition of the two emails sent for every new reservation.

use bookings_core::stay::format_date;
use bookings_db::models::reservation::Reservation;
use bookings_events::{DispatchError, MailData, MailDispatcher};

/// Template wrapping the guest confirmation.
pub const GUEST_TEMPLATE: &str = "basic.html";

pub const GUEST_SUBJECT: &str = "Reservation Confirmation";
pub const OWNER_SUBJECT: &str = "Reservation Notification";

/// A notification that could not be queued. Never fatal to the booking.
#[derive(Debug, thiserror::Error)]
#[error("'{subject}' to {to} was not queued: {source}")]
pub struct NotificationError {
    pub to: String,
    pub subject: String,
    #[source]
    pub source: DispatchError,
}

/// Escape text interpolated into an HTML mail body.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

/// Builds notification emails and hands them to the mail queue.
#[derive(Clone)]
pub struct Notifier {
    mailer: MailDispatcher,
    from: String,
    owner_email: String,
}

impl Notifier {
    pub fn new(
        mailer: MailDispatcher,
        from: impl Into<String>,
        owner_email: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            from: from.into(),
            owner_email: owner_email.into(),
        }
    }

    pub fn guest_confirmation(&self, reservation: &Reservation) -> MailData {
        let content = format!(
            "<strong>Reservation Confirmation</strong><br>\
             Dear {}:<br>\
             This is to confirm your reservation from {} to {}.",
            escape_html(&reservation.first_name),
            format_date(reservation.start_date),
            format_date(reservation.end_date),
        );
        MailData::new(&reservation.email, &self.from, GUEST_SUBJECT, content)
            .with_template(GUEST_TEMPLATE)
    }

    pub fn owner_notification(&self, reservation: &Reservation) -> MailData {
        let content = format!(
            "<strong>Reservation Notification</strong><br>\
             A reservation has been made for {} from {} to {}.",
            escape_html(&reservation.room_name),
            format_date(reservation.start_date),
            format_date(reservation.end_date),
        );
        MailData::new(&self.owner_email, &self.from, OWNER_SUBJECT, content)
    }

    /// Queue both notifications for a committed reservation.
    ///
    /// Returns the messages that could not be queued; each is logged.
    pub fn reservation_created(&self, reservation: &Reservation) -> Vec<NotificationError> {
        [
            self.guest_confirmation(reservation),
            self.owner_notification(reservation),
        ]
        .into_iter()
        .filter_map(|mail| {
            let (to, subject) = (mail.to.clone(), mail.subject.clone());
            self.mailer.send(mail).err().map(|source| {
                tracing::warn!(
                    reservation_id = reservation.id,
                    to = %to,
                    subject = %subject,
                    error = %source,
                    "Notification not queued"
                );
                NotificationError {
                    to,
                    subject,
                    source,
                }
            })
        })
        .collect()
    }
}
