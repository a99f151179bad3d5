//! Booking services: the availability engine, the reservation workflow, the
//! admin calendar aggregator, and notification composition.
//!
//! Services hold their store capabilities behind `Arc<dyn ...>` and are cheap
//! to clone into [`AppState`](crate::state::AppState).

pub mod availability;
pub mod calendar;
pub mod notifications;
pub mod workflow;

pub use availability::AvailabilityEngine;
pub use calendar::{BlockEditSummary, BlockEdits, CalendarAggregator, RoomCalendar};
pub use notifications::{NotificationError, Notifier};
pub use workflow::{BookingError, ReservationForm, ReservationReceipt, ReservationWorkflow};
