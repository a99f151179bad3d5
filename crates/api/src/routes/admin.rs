//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require an admin session (enforced by handler extractors).
///
/// ```text
/// GET    /dashboard                          -> dashboard
/// GET    /reservations/cal                   -> calendar
/// POST   /reservations/cal                   -> update_calendar
/// GET    /reservations/{src}                 -> list_reservations
/// GET    /reservations/{src}/{id}/show       -> show_reservation
/// POST   /reservations/{src}/{id}/show       -> update_reservation
/// GET    /process-reservation/{src}/{id}     -> process_reservation
/// GET    /delete-reservation/{src}/{id}      -> delete_reservation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/reservations/cal",
            get(admin::calendar).post(admin::update_calendar),
        )
        .route("/reservations/{src}", get(admin::list_reservations))
        .route(
            "/reservations/{src}/{id}/show",
            get(admin::show_reservation).post(admin::update_reservation),
        )
        .route(
            "/process-reservation/{src}/{id}",
            get(admin::process_reservation),
        )
        .route(
            "/delete-reservation/{src}/{id}",
            get(admin::delete_reservation),
        )
}
