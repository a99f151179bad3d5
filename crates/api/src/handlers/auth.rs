//! Handlers for `/user/login` and `/user/logout`.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use bookings_core::guest::{field_errors, not_blank};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

use crate::auth::authenticate;
use crate::error::AppResult;
use crate::middleware::auth::{CurrentUser, LOGIN_PATH};
use crate::response::Page;
use crate::session;
use crate::state::AppState;

const LOGIN_TEMPLATE: &str = "login.page.tmpl";

/// Form body for `POST /user/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "not_blank"), email(message = "Invalid email address"))]
    #[serde(default)]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub password: String,
}

/// GET /user/login
pub async fn login_page(session: Session) -> AppResult<Response> {
    Ok(Page::new(LOGIN_TEMPLATE)
        .render(&session)
        .await?
        .into_response())
}

/// POST /user/login
///
/// On success the session id is renewed before the login is recorded.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if let Err(e) = form.validate() {
        let page = Page::new(LOGIN_TEMPLATE)
            .with_string("email", form.email.clone())
            .with_form_errors(field_errors(&e));
        return Ok(page.render(&session).await?.into_response());
    }

    let user = match authenticate(state.users.as_ref(), form.email.trim(), &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            session::put_error(&session, "Invalid login credentials").await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
        Err(e) => {
            tracing::error!(error = %e, "Login lookup failed");
            session::put_error(&session, "Can't log in right now").await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
    };

    session.cycle_id().await?;
    CurrentUser {
        user_id: user.id,
        access_level: user.access_level,
    }
    .store(&session)
    .await?;
    tracing::info!(user_id = user.id, "User logged in");

    session::redirect_with_flash(&session, "Logged in successfully", "/").await
}

/// GET /user/logout
pub async fn logout(session: Session) -> AppResult<Response> {
    session.flush().await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}
