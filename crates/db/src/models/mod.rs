//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the database row and,
//! where the booking flow writes it, a create DTO.

pub mod reservation;
pub mod room;
pub mod room_restriction;
pub mod user;
