//! Static informational pages.

use axum::Json;
use tower_sessions::Session;

use crate::error::AppResult;
use crate::response::Page;

/// GET /
pub async fn home(session: Session) -> AppResult<Json<Page>> {
    Page::new("home.page.tmpl").render(&session).await
}

/// GET /about
pub async fn about(session: Session) -> AppResult<Json<Page>> {
    Page::new("about.page.tmpl").render(&session).await
}

/// GET /generals-quarters
pub async fn generals_quarters(session: Session) -> AppResult<Json<Page>> {
    Page::new("generals.page.tmpl").render(&session).await
}

/// GET /majors-suite
pub async fn majors_suite(session: Session) -> AppResult<Json<Page>> {
    Page::new("majors.page.tmpl").render(&session).await
}

/// GET /contact
pub async fn contact(session: Session) -> AppResult<Json<Page>> {
    Page::new("contact.page.tmpl").render(&session).await
}
