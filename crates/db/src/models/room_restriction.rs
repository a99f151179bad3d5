//! Room restriction entity model and DTOs.

use bookings_core::calendar::CalendarRestriction;
use bookings_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An interval `[start_date, end_date)` during which a room is not bookable.
///
/// `reservation_id` is set for booking-originated rows and `None` for owner
/// blocks placed from the admin calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RoomRestriction {
    pub id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub room_id: DbId,
    pub reservation_id: Option<DbId>,
    pub restriction_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RoomRestriction {
    pub fn is_block(&self) -> bool {
        self.reservation_id.is_none()
    }

    pub fn to_calendar(&self) -> CalendarRestriction {
        CalendarRestriction {
            id: self.id,
            reservation_id: self.reservation_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// DTO for inserting a restriction row.
#[derive(Debug, Clone)]
pub struct CreateRoomRestriction {
    pub start_date: Date,
    pub end_date: Date,
    pub room_id: DbId,
    pub reservation_id: Option<DbId>,
    pub restriction_id: DbId,
}
