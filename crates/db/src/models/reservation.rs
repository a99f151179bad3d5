//! Reservation entity model and DTOs.

use bookings_core::guest::GuestDetails;
use bookings_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A guest booking joined with its room's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Reservation {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,
    pub room_id: DbId,
    /// Resolved from `rooms.room_name`.
    pub room_name: String,
    pub processed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// The guest contact fields of this reservation.
    pub fn guest(&self) -> GuestDetails {
        GuestDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// DTO for creating a reservation (and, atomically, its restriction row).
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub guest: GuestDetails,
    pub room_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
}

/// DTO for the admin edit form. Replaces every guest contact field.
#[derive(Debug, Clone)]
pub struct UpdateGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<GuestDetails> for UpdateGuest {
    fn from(g: GuestDetails) -> Self {
        Self {
            first_name: g.first_name,
            last_name: g.last_name,
            email: g.email,
            phone: g.phone,
        }
    }
}

/// Which reservations the admin grid lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationFilter {
    /// Every reservation.
    All,
    /// Only reservations not yet marked processed.
    New,
}

impl ReservationFilter {
    /// Parse the `{src}` path segment (`all` or `new`).
    pub fn from_src(src: &str) -> Option<Self> {
        match src {
            "all" => Some(Self::All),
            "new" => Some(Self::New),
            _ => None,
        }
    }

    pub fn as_src(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
        }
    }
}
