//! Capability traits the booking services are written against.
//!
//! [`PgStore`] is the production adapter; [`MemoryStore`] is an in-memory
//! fake with the same observable semantics, used by tests. Both are selected
//! explicitly at construction time.

use std::time::Duration;

use async_trait::async_trait;
use bookings_core::types::{Date, DbId};

use crate::models::reservation::{CreateReservation, Reservation, ReservationFilter, UpdateGuest};
use crate::models::room::Room;
use crate::models::room_restriction::RoomRestriction;
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failure of a single store call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The call did not complete within the configured query timeout.
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    /// A booking for this room already holds some of the requested nights.
    #[error("Room {room_id} already booked for an overlapping stay")]
    Overlap { room_id: DbId },

    /// A unique constraint rejected the write.
    #[error("Duplicate value violates {0}")]
    Duplicate(String),
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Date-range queries and admin block management on room restrictions.
///
/// All ranges are half-open `[start, end)` unless noted.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// True iff no restriction on `room_id` overlaps `[start, end)`.
    async fn room_is_available(
        &self,
        room_id: DbId,
        start: Date,
        end: Date,
    ) -> Result<bool, StoreError>;

    /// Every room with no overlapping restriction, ID ascending.
    async fn available_rooms(&self, start: Date, end: Date) -> Result<Vec<Room>, StoreError>;

    /// Restrictions on a room touching the closed interval `[first, last]`.
    async fn restrictions_for_room(
        &self,
        room_id: DbId,
        first: Date,
        last: Date,
    ) -> Result<Vec<RoomRestriction>, StoreError>;

    /// Place a one-night owner block on `day`. No occupancy check.
    async fn insert_block(&self, room_id: DbId, day: Date) -> Result<RoomRestriction, StoreError>;

    /// Remove an owner block. Returns `false` if `id` is not a block.
    async fn delete_block(&self, id: DbId) -> Result<bool, StoreError>;
}

/// Rooms and reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_room(&self, id: DbId) -> Result<Option<Room>, StoreError>;

    /// Every room, ID ascending.
    async fn all_rooms(&self) -> Result<Vec<Room>, StoreError>;

    /// Insert a reservation and its restriction atomically.
    ///
    /// Fails with [`StoreError::Overlap`] if another booking already holds an
    /// overlapping stay on the same room; nothing is written in that case.
    async fn create_reservation(
        &self,
        input: &CreateReservation,
    ) -> Result<(Reservation, RoomRestriction), StoreError>;

    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError>;

    /// Reservations matching `filter`, arrival date ascending.
    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn update_guest(
        &self,
        id: DbId,
        input: &UpdateGuest,
    ) -> Result<Option<Reservation>, StoreError>;

    async fn set_processed(&self, id: DbId, processed: bool) -> Result<bool, StoreError>;

    /// Delete a reservation together with its restriction.
    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Admin accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;
}

/// Everything the web application needs from its backing store.
pub trait Store: AvailabilityStore + ReservationStore + UserStore + 'static {}

impl<T> Store for T where T: AvailabilityStore + ReservationStore + UserStore + 'static {}
