//! Typed access to session values.
//!
//! Session entries are JSON. Every read goes through [`read`], which reports a
//! missing key and a value of the wrong shape as distinct outcomes instead of
//! failing the request.

use axum::response::{IntoResponse, Redirect, Response};
use bookings_core::guest::GuestDetails;
use bookings_core::types::{Date, DbId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

pub const RESERVATION_KEY: &str = "reservation";
pub const FLASH_KEY: &str = "flash";
pub const WARNING_KEY: &str = "warning";
pub const ERROR_KEY: &str = "error";
pub const USER_ID_KEY: &str = "user_id";
pub const ACCESS_LEVEL_KEY: &str = "access_level";

/// Key holding the block map last shown for a room on the admin calendar.
pub fn block_map_key(room_id: DbId) -> String {
    format!("block_map_{room_id}")
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Result of decoding one session entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue<T> {
    Present(T),
    Absent,
    /// Stored, but not decodable as `T`.
    WrongShape,
}

impl<T> SessionValue<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::WrongShape => None,
        }
    }
}

/// Decode the entry under `key`.
pub async fn read<T: DeserializeOwned>(session: &Session, key: &str) -> AppResult<SessionValue<T>> {
    let Some(value) = session.get_value(key).await? else {
        return Ok(SessionValue::Absent);
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(SessionValue::Present(decoded)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Session value has unexpected shape");
            Ok(SessionValue::WrongShape)
        }
    }
}

/// Remove and decode the entry under `key`.
pub async fn take<T: DeserializeOwned>(session: &Session, key: &str) -> AppResult<SessionValue<T>> {
    let value = read(session, key).await?;
    if !matches!(value, SessionValue::Absent) {
        session.remove_value(key).await?;
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Pending reservation
// ---------------------------------------------------------------------------

/// A booking draft carried across search, room choice, form, and summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReservation {
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub room_id: Option<DbId>,
    #[serde(default)]
    pub room_name: Option<String>,
    /// Set once the reservation has been stored.
    #[serde(default)]
    pub reservation_id: Option<DbId>,
    #[serde(default)]
    pub guest: GuestDetails,
}

impl PendingReservation {
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
            room_id: None,
            room_name: None,
            reservation_id: None,
            guest: GuestDetails::default(),
        }
    }

    pub async fn load(session: &Session) -> AppResult<SessionValue<Self>> {
        read(session, RESERVATION_KEY).await
    }

    pub async fn take(session: &Session) -> AppResult<SessionValue<Self>> {
        take(session, RESERVATION_KEY).await
    }

    pub async fn store(&self, session: &Session) -> AppResult<()> {
        session.insert(RESERVATION_KEY, self).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One-shot user messages shown on the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Messages {
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

pub async fn put_flash(session: &Session, message: impl Into<String>) -> AppResult<()> {
    session.insert(FLASH_KEY, message.into()).await?;
    Ok(())
}

pub async fn put_error(session: &Session, message: impl Into<String>) -> AppResult<()> {
    session.insert(ERROR_KEY, message.into()).await?;
    Ok(())
}

/// Remove and return every pending message.
pub async fn pop_messages(session: &Session) -> AppResult<Messages> {
    Ok(Messages {
        flash: take::<String>(session, FLASH_KEY).await?.present(),
        warning: take::<String>(session, WARNING_KEY).await?.present(),
        error: take::<String>(session, ERROR_KEY).await?.present(),
    })
}

/// Record an error message and send a GET request on to a safe page (307).
pub async fn redirect_with_error(
    session: &Session,
    message: &str,
    to: &str,
) -> AppResult<Response> {
    tracing::debug!(message, to, "Redirecting with error");
    put_error(session, message).await?;
    Ok(Redirect::temporary(to).into_response())
}

/// Record an error message and answer a form POST with a 303, so the
/// browser follows up with a GET of `to`.
pub async fn redirect_post_with_error(
    session: &Session,
    message: &str,
    to: &str,
) -> AppResult<Response> {
    tracing::debug!(message, to, "Redirecting form post with error");
    put_error(session, message).await?;
    Ok(Redirect::to(to).into_response())
}

/// Record a flash message and continue to the next step (303).
pub async fn redirect_with_flash(
    session: &Session,
    message: &str,
    to: &str,
) -> AppResult<Response> {
    put_flash(session, message).await?;
    Ok(Redirect::to(to).into_response())
}
