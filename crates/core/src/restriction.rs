//! Restriction kinds matching the `restrictions` seed data.

use crate::types::DbId;

/// A room restriction created together with a guest reservation.
pub const RESTRICTION_RESERVATION: DbId = 1;

/// An administrative block placed by the owner from the calendar.
pub const RESTRICTION_OWNER_BLOCK: DbId = 2;
