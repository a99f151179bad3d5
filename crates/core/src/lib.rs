//! Domain logic for the room booking site.
//!
//! This crate has zero internal dependencies so the repository layer, the
//! HTTP server, and any CLI tooling can all share it.

pub mod access;
pub mod calendar;
pub mod error;
pub mod guest;
pub mod restriction;
pub mod stay;
pub mod types;
