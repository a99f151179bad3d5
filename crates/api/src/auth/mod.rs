//! Admin authentication.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`authenticate`] -- email + password check against the user store.

pub mod password;

use bookings_db::models::user::User;
use bookings_db::store::UserStore;

use crate::error::{AppError, AppResult};

/// Look up a user by email and check the password.
///
/// Returns `None` for an unknown email or a wrong password; the caller
/// cannot tell which.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let Some(user) = users.find_user_by_email(email).await? else {
        tracing::info!("Login attempt for unknown email");
        return Ok(None);
    };

    let matches = password::verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash unusable: {e}")))?;
    if !matches {
        tracing::info!(user_id = user.id, "Login attempt with wrong password");
        return Ok(None);
    }
    Ok(Some(user))
}
