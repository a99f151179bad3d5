//! In-memory store with the same observable semantics as [`PgStore`].
//!
//! Used by unit and HTTP tests. All writes happen under one write lock, so
//! the overlap rule for bookings holds under concurrent callers.
//!
//! [`PgStore`]: super::PgStore

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bookings_core::restriction::{RESTRICTION_OWNER_BLOCK, RESTRICTION_RESERVATION};
use bookings_core::stay::overlaps;
use bookings_core::types::{Date, DbId};
use chrono::{Days, Utc};
use tokio::sync::RwLock;

use super::{AvailabilityStore, ReservationStore, StoreError, UserStore};
use crate::models::reservation::{CreateReservation, Reservation, ReservationFilter, UpdateGuest};
use crate::models::room::Room;
use crate::models::room_restriction::RoomRestriction;
use crate::models::user::{CreateUser, User};

/// Rooms every fresh [`MemoryStore`] starts with, matching the seed migration.
pub const SEED_ROOMS: [(DbId, &str); 2] = [(1, "General's Quarters"), (2, "Major's Suite")];

#[derive(Default)]
struct Inner {
    rooms: BTreeMap<DbId, Room>,
    reservations: BTreeMap<DbId, Reservation>,
    restrictions: BTreeMap<DbId, RoomRestriction>,
    users: BTreeMap<DbId, User>,
    next_reservation_id: DbId,
    next_restriction_id: DbId,
    next_user_id: DbId,
}

impl Inner {
    fn restriction_overlapping(&self, room_id: DbId, start: Date, end: Date) -> bool {
        self.restrictions
            .values()
            .any(|r| r.room_id == room_id && overlaps(r.start_date, r.end_date, start, end))
    }

    fn booking_overlapping(&self, room_id: DbId, start: Date, end: Date) -> bool {
        self.restrictions.values().any(|r| {
            r.room_id == room_id
                && r.reservation_id.is_some()
                && overlaps(r.start_date, r.end_date, start, end)
        })
    }

    fn insert_restriction(
        &mut self,
        room_id: DbId,
        reservation_id: Option<DbId>,
        restriction_id: DbId,
        start_date: Date,
        end_date: Date,
    ) -> RoomRestriction {
        self.next_restriction_id += 1;
        let now = Utc::now();
        let row = RoomRestriction {
            id: self.next_restriction_id,
            start_date,
            end_date,
            room_id,
            reservation_id,
            restriction_id,
            created_at: now,
            updated_at: now,
        };
        self.restrictions.insert(row.id, row.clone());
        row
    }
}

/// In-memory [`Store`](super::Store) implementation.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A store seeded with the standard rooms.
    pub fn new() -> Self {
        Self::with_rooms(SEED_ROOMS)
    }

    /// A store seeded with the given `(id, name)` rooms.
    pub fn with_rooms<'a>(rooms: impl IntoIterator<Item = (DbId, &'a str)>) -> Self {
        let now = Utc::now();
        let mut inner = Inner::default();
        for (id, name) in rooms {
            inner.rooms.insert(
                id,
                Room {
                    id,
                    room_name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        Self {
            inner: RwLock::new(inner),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate an unreachable database: every call fails with a timeout.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of restriction rows, of any kind.
    pub async fn restriction_count(&self) -> usize {
        self.inner.read().await.restrictions.len()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::ZERO));
        }
        Ok(())
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn room_is_available(
        &self,
        room_id: DbId,
        start: Date,
        end: Date,
    ) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let inner = self.inner.read().await;
        Ok(!inner.restriction_overlapping(room_id, start, end))
    }

    async fn available_rooms(&self, start: Date, end: Date) -> Result<Vec<Room>, StoreError> {
        self.ensure_online()?;
        let inner = self.inner.read().await;
        Ok(inner
            .rooms
            .values()
            .filter(|room| !inner.restriction_overlapping(room.id, start, end))
            .cloned()
            .collect())
    }

    async fn restrictions_for_room(
        &self,
        room_id: DbId,
        first: Date,
        last: Date,
    ) -> Result<Vec<RoomRestriction>, StoreError> {
        self.ensure_online()?;
        let inner = self.inner.read().await;
        let mut rows: Vec<RoomRestriction> = inner
            .restrictions
            .values()
            .filter(|r| r.room_id == room_id && r.start_date <= last && r.end_date > first)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_date, r.id));
        Ok(rows)
    }

    async fn insert_block(&self, room_id: DbId, day: Date) -> Result<RoomRestriction, StoreError> {
        self.ensure_online()?;
        let end = day.checked_add_days(Days::new(1)).ok_or_else(|| {
            StoreError::Database(sqlx::Error::Protocol(format!("block day {day} out of range")))
        })?;
        let mut inner = self.inner.write().await;
        if !inner.rooms.contains_key(&room_id) {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }
        Ok(inner.insert_restriction(room_id, None, RESTRICTION_OWNER_BLOCK, day, end))
    }

    async fn delete_block(&self, id: DbId) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut inner = self.inner.write().await;
        let is_block = inner
            .restrictions
            .get(&id)
            .is_some_and(|r| r.reservation_id.is_none());
        if is_block {
            inner.restrictions.remove(&id);
        }
        Ok(is_block)
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_room(&self, id: DbId) -> Result<Option<Room>, StoreError> {
        self.ensure_online()?;
        Ok(self.inner.read().await.rooms.get(&id).cloned())
    }

    async fn all_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.ensure_online()?;
        Ok(self.inner.read().await.rooms.values().cloned().collect())
    }

    async fn create_reservation(
        &self,
        input: &CreateReservation,
    ) -> Result<(Reservation, RoomRestriction), StoreError> {
        self.ensure_online()?;
        let mut inner = self.inner.write().await;

        let room_name = match inner.rooms.get(&input.room_id) {
            Some(room) => room.room_name.clone(),
            None => return Err(StoreError::Database(sqlx::Error::RowNotFound)),
        };
        if inner.booking_overlapping(input.room_id, input.start_date, input.end_date) {
            return Err(StoreError::Overlap {
                room_id: input.room_id,
            });
        }

        inner.next_reservation_id += 1;
        let now = Utc::now();
        let reservation = Reservation {
            id: inner.next_reservation_id,
            first_name: input.guest.first_name.trim().to_string(),
            last_name: input.guest.last_name.trim().to_string(),
            email: input.guest.email.trim().to_string(),
            phone: input.guest.phone.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            room_id: input.room_id,
            room_name,
            processed: false,
            created_at: now,
            updated_at: now,
        };
        inner.reservations.insert(reservation.id, reservation.clone());
        let restriction = inner.insert_restriction(
            input.room_id,
            Some(reservation.id),
            RESTRICTION_RESERVATION,
            input.start_date,
            input.end_date,
        );
        Ok((reservation, restriction))
    }

    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        self.ensure_online()?;
        Ok(self.inner.read().await.reservations.get(&id).cloned())
    }

    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.ensure_online()?;
        let inner = self.inner.read().await;
        let mut rows: Vec<Reservation> = inner
            .reservations
            .values()
            .filter(|r| filter == ReservationFilter::All || !r.processed)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_date, r.id));
        Ok(rows)
    }

    async fn update_guest(
        &self,
        id: DbId,
        input: &UpdateGuest,
    ) -> Result<Option<Reservation>, StoreError> {
        self.ensure_online()?;
        let mut inner = self.inner.write().await;
        Ok(inner.reservations.get_mut(&id).map(|r| {
            r.first_name = input.first_name.trim().to_string();
            r.last_name = input.last_name.trim().to_string();
            r.email = input.email.trim().to_string();
            r.phone = input.phone.trim().to_string();
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn set_processed(&self, id: DbId, processed: bool) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut inner = self.inner.write().await;
        Ok(match inner.reservations.get_mut(&id) {
            Some(r) => {
                r.processed = processed;
                r.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut inner = self.inner.write().await;
        if inner.reservations.remove(&id).is_none() {
            return Ok(false);
        }
        inner.restrictions.retain(|_, r| r.reservation_id != Some(id));
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_online()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.ensure_online()?;
        let email = email.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        self.ensure_online()?;
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        self.ensure_online()?;
        let email = input.email.trim().to_lowercase();
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("uq_users_email".to_string()));
        }
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email,
            password_hash: input.password_hash.clone(),
            access_level: input.access_level,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}
