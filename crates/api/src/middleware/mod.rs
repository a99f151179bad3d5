//! Session-based authentication extractors.
//!
//! - [`auth::CurrentUser`] -- The logged-in user, if any, read from the session.
//! - [`auth::RequireAdmin`] -- Requires an admin session; redirects to the login page otherwise.

pub mod auth;
