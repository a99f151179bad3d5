pub mod admin;
pub mod health;
pub mod public;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                          home
/// /about, /generals-quarters, /majors-suite, /contact
/// /search-availability                       search form (GET), search (POST)
/// /search-availability-json                  single-room check (POST)
/// /choose-room/{id}                          attach room to draft
/// /book-room?id=&s=&e=                       start draft from a room page
/// /make-reservation                          guest form (GET), submit (POST)
/// /reservation-summary                       confirmation, clears draft
///
/// /user/login                                login form (GET), login (POST)
/// /user/logout                               logout
///
/// /admin/...                                 see routes::admin (admin only)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
}
