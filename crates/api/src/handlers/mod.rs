//! Request handlers.
//!
//! Public booking-flow handlers recover failures into a session message plus
//! a redirect. Admin handlers propagate [`AppError`](crate::error::AppError)
//! and let it render as JSON.

pub mod admin;
pub mod auth;
pub mod availability;
pub mod pages;
pub mod reservation;
