//! The reservation form and its summary page.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use bookings_core::guest::FieldErrors;
use bookings_core::stay::format_date;
use tower_sessions::Session;

use crate::booking::{BookingError, ReservationForm};
use crate::error::AppResult;
use crate::response::Page;
use crate::session::{self, PendingReservation, SessionValue};
use crate::state::AppState;

const MISSING_DRAFT: &str = "Can't get reservation from session";

fn reservation_page(draft: &PendingReservation, errors: FieldErrors) -> AppResult<Page> {
    Ok(Page::new("make-reservation.page.tmpl")
        .with_string("start_date", format_date(draft.start_date))
        .with_string("end_date", format_date(draft.end_date))
        .with_data("reservation", draft)?
        .with_form_errors(errors))
}

/// GET /make-reservation
///
/// Shows the guest form for the draft's room and dates.
pub async fn form_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let Some(mut draft) = PendingReservation::load(&session).await?.present() else {
        return session::redirect_with_error(&session, MISSING_DRAFT, "/").await;
    };
    let Some(room_id) = draft.room_id else {
        return session::redirect_with_error(&session, "Can't find room", "/").await;
    };

    let room = match state.reservations.find_room(room_id).await {
        Ok(Some(room)) => room,
        Ok(None) => return session::redirect_with_error(&session, "Can't find room", "/").await,
        Err(e) => {
            tracing::error!(room_id, error = %e, "Room lookup failed");
            return session::redirect_with_error(&session, "Can't find room", "/").await;
        }
    };

    draft.room_name = Some(room.room_name);
    draft.store(&session).await?;

    let page = reservation_page(&draft, FieldErrors::new())?;
    Ok(page.render(&session).await?.into_response())
}

/// POST /make-reservation
///
/// Runs the reservation workflow. Invalid input re-displays the form with
/// per-field messages; success moves on to the summary.
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ReservationForm>,
) -> AppResult<Response> {
    let pending = PendingReservation::load(&session).await?.present();

    match state.workflow.reserve(pending.as_ref(), &form).await {
        Ok(receipt) => {
            // Unqueued notifications were logged by the notifier; the booking stands.
            let reservation = receipt.reservation;
            let draft = PendingReservation {
                start_date: reservation.start_date,
                end_date: reservation.end_date,
                room_id: Some(reservation.room_id),
                room_name: Some(reservation.room_name.clone()),
                reservation_id: Some(reservation.id),
                guest: reservation.guest(),
            };
            draft.store(&session).await?;
            Ok(Redirect::to("/reservation-summary").into_response())
        }
        Err(BookingError::Validation(errors)) => match pending {
            Some(mut draft) => {
                draft.guest = form.guest();
                let page = reservation_page(&draft, errors)?;
                Ok(page.render(&session).await?.into_response())
            }
            None => session::redirect_post_with_error(&session, MISSING_DRAFT, "/").await,
        },
        Err(BookingError::SessionMissing) => {
            session::redirect_post_with_error(&session, MISSING_DRAFT, "/").await
        }
        Err(BookingError::RoomNotFound(room_id)) => {
            tracing::info!(room_id, "Reservation posted for unknown room");
            session::redirect_post_with_error(&session, "Can't find room", "/").await
        }
        Err(BookingError::RoomUnavailable) => {
            session::put_error(&session, "The room is no longer available for those dates")
                .await?;
            Ok(Redirect::to("/search-availability").into_response())
        }
        Err(BookingError::Persistence(e)) => {
            tracing::error!(error = %e, "Reservation could not be saved");
            session::redirect_post_with_error(&session, "Can't save reservation", "/").await
        }
    }
}

/// GET /reservation-summary
///
/// Shows the stored reservation once and clears the draft.
pub async fn summary(session: Session) -> AppResult<Response> {
    let draft = match PendingReservation::take(&session).await? {
        SessionValue::Present(draft) if draft.reservation_id.is_some() => draft,
        SessionValue::Present(_) | SessionValue::Absent | SessionValue::WrongShape => {
            return session::redirect_with_error(&session, MISSING_DRAFT, "/").await;
        }
    };

    let page = Page::new("reservation-summary.page.tmpl")
        .with_string("start_date", format_date(draft.start_date))
        .with_string("end_date", format_date(draft.end_date))
        .with_data("reservation", &draft)?;
    Ok(page.render(&session).await?.into_response())
}
