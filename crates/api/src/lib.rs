//! Bookings web server library.
//!
//! Exposes the building blocks (config, state, error handling, booking
//! services, routes) so integration tests and the binaries can share them.

pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
