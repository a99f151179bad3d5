//! Mail notification pipeline for the booking site.
//!
//! - [`MailData`] -- one outgoing message: recipient, sender, subject, body,
//!   and an optional HTML template name.
//! - [`MailTransport`] -- the delivery seam, with SMTP ([`EmailDelivery`]),
//!   log-only ([`LogTransport`]), and in-memory ([`MemoryTransport`])
//!   implementations.
//! - [`MailDispatcher`] -- bounded queue drained by a single background
//!   worker. Enqueueing never waits on delivery.

pub mod delivery;
pub mod dispatcher;
pub mod mail;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::log::LogTransport;
pub use delivery::memory::MemoryTransport;
pub use delivery::MailTransport;
pub use dispatcher::{DispatchError, MailDispatcher, MailQueue};
pub use mail::MailData;
