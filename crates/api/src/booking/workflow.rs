//! The reservation workflow: validate, persist atomically, notify.

use std::sync::Arc;

use bookings_core::guest::{FieldErrors, GuestDetails};
use bookings_core::stay::{parse_date, StayDates};
use bookings_core::types::DbId;
use bookings_db::models::reservation::{CreateReservation, Reservation};
use bookings_db::models::room_restriction::RoomRestriction;
use bookings_db::store::{ReservationStore, StoreError};
use serde::Deserialize;

use super::availability::AvailabilityEngine;
use super::notifications::{NotificationError, Notifier};
use crate::session::PendingReservation;

/// Raw fields posted from the reservation form.
///
/// `room_id`, `start_date`, and `end_date` may be left empty, in which case
/// the pending reservation supplies them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl ReservationForm {
    pub fn guest(&self) -> GuestDetails {
        GuestDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// User-correctable input problems, per field. Nothing was written.
    #[error("Reservation form is invalid")]
    Validation(FieldErrors),

    /// No reservation draft in the session.
    #[error("No reservation in progress")]
    SessionMissing,

    #[error("Room {0} not found")]
    RoomNotFound(DbId),

    /// Another restriction holds some of the requested nights.
    #[error("Room is not available for the requested dates")]
    RoomUnavailable,

    #[error("Could not save reservation: {0}")]
    Persistence(#[from] StoreError),
}

/// Outcome of a committed reservation.
#[derive(Debug)]
pub struct ReservationReceipt {
    pub reservation: Reservation,
    pub restriction: RoomRestriction,
    /// Notifications that could not be queued. The booking stands regardless.
    pub notification_failures: Vec<NotificationError>,
}

/// Turns a pending reservation plus guest details into a stored booking.
#[derive(Clone)]
pub struct ReservationWorkflow {
    reservations: Arc<dyn ReservationStore>,
    availability: AvailabilityEngine,
    notifier: Notifier,
}

impl ReservationWorkflow {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        availability: AvailabilityEngine,
        notifier: Notifier,
    ) -> Self {
        Self {
            reservations,
            availability,
            notifier,
        }
    }

    /// Validate and store a reservation, then queue its notifications.
    ///
    /// The reservation and its restriction are written in one unit; a
    /// concurrent booking that wins the race surfaces as
    /// [`BookingError::RoomUnavailable`].
    pub async fn reserve(
        &self,
        pending: Option<&PendingReservation>,
        form: &ReservationForm,
    ) -> Result<ReservationReceipt, BookingError> {
        let pending = pending.ok_or(BookingError::SessionMissing)?;

        let guest = form.guest();
        let mut errors = guest.check().err().unwrap_or_default();
        let (room_id, stay) = match resolve_stay(pending, form, &mut errors) {
            Some(request) if errors.is_empty() => request,
            _ => return Err(BookingError::Validation(errors)),
        };

        if self.reservations.find_room(room_id).await?.is_none() {
            return Err(BookingError::RoomNotFound(room_id));
        }
        if !self.availability.room_is_available(room_id, &stay).await? {
            return Err(BookingError::RoomUnavailable);
        }

        let input = CreateReservation {
            guest,
            room_id,
            start_date: stay.start(),
            end_date: stay.end(),
        };
        let (reservation, restriction) = match self.reservations.create_reservation(&input).await {
            Ok(created) => created,
            Err(StoreError::Overlap { room_id }) => {
                tracing::info!(room_id, "Lost booking race to a concurrent reservation");
                return Err(BookingError::RoomUnavailable);
            }
            Err(e) => return Err(BookingError::Persistence(e)),
        };

        tracing::info!(
            reservation_id = reservation.id,
            room_id,
            start = %reservation.start_date,
            end = %reservation.end_date,
            "Reservation created"
        );

        let notification_failures = self.notifier.reservation_created(&reservation);

        Ok(ReservationReceipt {
            reservation,
            restriction,
            notification_failures,
        })
    }
}

/// Pick room and dates from the form, falling back to the draft.
///
/// Problems are added to `errors` under the offending field.
fn resolve_stay(
    pending: &PendingReservation,
    form: &ReservationForm,
    errors: &mut FieldErrors,
) -> Option<(DbId, StayDates)> {
    let mut push = |field: &str, message: String| {
        errors.entry(field.to_string()).or_default().push(message);
    };

    let room_id = match form.room_id.trim() {
        "" => pending.room_id,
        raw => raw.parse::<DbId>().ok(),
    };
    if room_id.is_none() {
        push("room_id", "Choose a room".to_string());
    }

    let start = match form.start_date.trim() {
        "" => Some(pending.start_date),
        raw => parse_date(raw)
            .map_err(|e| push("start_date", e.to_string()))
            .ok(),
    };
    let end = match form.end_date.trim() {
        "" => Some(pending.end_date),
        raw => parse_date(raw).map_err(|e| push("end_date", e.to_string())).ok(),
    };

    let stay = match (start, end) {
        (Some(start), Some(end)) => StayDates::new(start, end)
            .map_err(|e| push("end_date", e.to_string()))
            .ok(),
        _ => None,
    };

    Some((room_id?, stay?))
}
