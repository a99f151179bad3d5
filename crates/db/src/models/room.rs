//! Room reference data.

use bookings_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A bookable room from the `rooms` table. Read-only to the booking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Room {
    pub id: DbId,
    pub room_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
