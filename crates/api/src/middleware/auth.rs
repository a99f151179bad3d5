//! Login state carried in the session cookie.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use bookings_core::access::is_admin;
use bookings_core::types::DbId;
use tower_sessions::Session;

use crate::error::AppResult;
use crate::session::{self, ACCESS_LEVEL_KEY, USER_ID_KEY};
use crate::state::AppState;

/// Page unauthenticated admin requests are sent to.
pub const LOGIN_PATH: &str = "/user/login";

/// The user a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: DbId,
    pub access_level: i32,
}

impl CurrentUser {
    /// Read the login from `session`. A missing or garbled entry means
    /// nobody is logged in.
    pub async fn load(session: &Session) -> AppResult<Option<Self>> {
        let user_id = session::read::<DbId>(session, USER_ID_KEY).await?.present();
        let access_level = session::read::<i32>(session, ACCESS_LEVEL_KEY)
            .await?
            .present();
        Ok(match (user_id, access_level) {
            (Some(user_id), Some(access_level)) => Some(Self {
                user_id,
                access_level,
            }),
            _ => None,
        })
    }

    /// Record a successful login.
    pub async fn store(&self, session: &Session) -> AppResult<()> {
        session.insert(USER_ID_KEY, self.user_id).await?;
        session.insert(ACCESS_LEVEL_KEY, self.access_level).await?;
        Ok(())
    }
}

/// Requires a logged-in admin.
///
/// Anyone else gets an error message in the session and a 303 to the login
/// page.
///
/// ```ignore
/// async fn dashboard(RequireAdmin(user): RequireAdmin) -> AppResult<Json<Page>> {
///     tracing::info!(user_id = user.user_id, "admin dashboard");
///     ...
/// }
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match CurrentUser::load(&session).await {
            Ok(Some(user)) if is_admin(user.access_level) => Ok(RequireAdmin(user)),
            Ok(_) => Err(deny(&session).await),
            Err(e) => Err(e.into_response()),
        }
    }
}

async fn deny(session: &Session) -> Response {
    tracing::info!("Admin page requested without an admin session");
    match session::put_error(session, "Log in first!").await {
        Ok(()) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => e.into_response(),
    }
}
