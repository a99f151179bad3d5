//! PostgreSQL adapter for the store traits.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bookings_core::types::{Date, DbId};
use sqlx::PgPool;

use super::{AvailabilityStore, ReservationStore, StoreError, UserStore};
use crate::models::reservation::{CreateReservation, Reservation, ReservationFilter, UpdateGuest};
use crate::models::room::Room;
use crate::models::room_restriction::RoomRestriction;
use crate::models::user::{CreateUser, User};
use crate::repositories::{ReservationRepo, RoomRepo, RoomRestrictionRepo, UserRepo};

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for exclusion constraint violations.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Store backed by a `PgPool`. Every call is bounded by `query_timeout`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one repository call under the per-call timeout.
    ///
    /// A timed-out call is dropped. Transaction commits are never passed in
    /// here, so [`StoreError::Timeout`] always means the write did not land.
    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(result) => result.map_err(classify),
            Err(_) => {
                tracing::warn!(timeout_ms = self.query_timeout.as_millis() as u64, "Store call timed out");
                Err(StoreError::Timeout(self.query_timeout))
            }
        }
    }
}

/// Map constraint violations onto their store-level meaning.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(constraint) = db_err.constraint() {
                return StoreError::Duplicate(constraint.to_string());
            }
        }
    }
    StoreError::Database(err)
}

/// True when `err` is the booking overlap exclusion constraint firing.
fn is_booking_overlap(err: &StoreError) -> bool {
    match err {
        StoreError::Database(sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some(EXCLUSION_VIOLATION)
                && db_err.constraint().is_some_and(|c| c.starts_with("ex_"))
        }
        _ => false,
    }
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn room_is_available(
        &self,
        room_id: DbId,
        start: Date,
        end: Date,
    ) -> Result<bool, StoreError> {
        self.bounded(RoomRestrictionRepo::room_is_available(&self.pool, room_id, start, end))
            .await
    }

    async fn available_rooms(&self, start: Date, end: Date) -> Result<Vec<Room>, StoreError> {
        self.bounded(RoomRepo::list_available(&self.pool, start, end))
            .await
    }

    async fn restrictions_for_room(
        &self,
        room_id: DbId,
        first: Date,
        last: Date,
    ) -> Result<Vec<RoomRestriction>, StoreError> {
        self.bounded(RoomRestrictionRepo::list_for_room_between(
            &self.pool, room_id, first, last,
        ))
        .await
    }

    async fn insert_block(&self, room_id: DbId, day: Date) -> Result<RoomRestriction, StoreError> {
        self.bounded(RoomRestrictionRepo::insert_block(&self.pool, room_id, day))
            .await
    }

    async fn delete_block(&self, id: DbId) -> Result<bool, StoreError> {
        self.bounded(RoomRestrictionRepo::delete_block(&self.pool, id))
            .await
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn find_room(&self, id: DbId) -> Result<Option<Room>, StoreError> {
        self.bounded(RoomRepo::find_by_id(&self.pool, id)).await
    }

    async fn all_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.bounded(RoomRepo::list(&self.pool)).await
    }

    async fn create_reservation(
        &self,
        input: &CreateReservation,
    ) -> Result<(Reservation, RoomRestriction), StoreError> {
        let mut tx = self.bounded(self.pool.begin()).await?;
        let created = self
            .bounded(ReservationRepo::insert_with_restriction(&mut tx, input))
            .await
            .map_err(|e| {
                if is_booking_overlap(&e) {
                    StoreError::Overlap {
                        room_id: input.room_id,
                    }
                } else {
                    e
                }
            })?;

        // Outside the deadline: a timeout must mean nothing was written.
        tx.commit().await.map_err(classify)?;
        Ok(created)
    }

    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        self.bounded(ReservationRepo::find_by_id(&self.pool, id))
            .await
    }

    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.bounded(ReservationRepo::list(&self.pool, filter))
            .await
    }

    async fn update_guest(
        &self,
        id: DbId,
        input: &UpdateGuest,
    ) -> Result<Option<Reservation>, StoreError> {
        self.bounded(ReservationRepo::update_guest(&self.pool, id, input))
            .await
    }

    async fn set_processed(&self, id: DbId, processed: bool) -> Result<bool, StoreError> {
        self.bounded(ReservationRepo::set_processed(&self.pool, id, processed))
            .await
    }

    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError> {
        self.bounded(ReservationRepo::delete(&self.pool, id)).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.bounded(crate::health_check(&self.pool)).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.bounded(UserRepo::find_by_email(&self.pool, email))
            .await
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        self.bounded(UserRepo::find_by_id(&self.pool, id)).await
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        self.bounded(UserRepo::create(&self.pool, input)).await
    }
}
