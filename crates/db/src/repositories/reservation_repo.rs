//! Repository for the `reservations` table.

use bookings_core::restriction::RESTRICTION_RESERVATION;
use bookings_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::reservation::{CreateReservation, Reservation, ReservationFilter, UpdateGuest};
use crate::models::room_restriction::{CreateRoomRestriction, RoomRestriction};
use crate::repositories::RoomRestrictionRepo;

/// Reservation columns qualified for the `rooms` join.
const COLUMNS: &str = "res.id, res.first_name, res.last_name, res.email, res.phone, \
                        res.start_date, res.end_date, res.room_id, rm.room_name, \
                        res.processed, res.created_at, res.updated_at";

/// Provides CRUD operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a reservation and its booking restriction in one transaction.
    ///
    /// Either both rows commit or neither does. An overlapping booking on the
    /// same room fails the restriction insert with an exclusion violation.
    pub async fn create_with_restriction(
        pool: &PgPool,
        input: &CreateReservation,
    ) -> Result<(Reservation, RoomRestriction), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::insert_with_restriction(&mut tx, input).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Both inserts of [`Self::create_with_restriction`] inside a caller-owned
    /// transaction. Nothing is visible until the caller commits.
    pub async fn insert_with_restriction(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateReservation,
    ) -> Result<(Reservation, RoomRestriction), sqlx::Error> {
        let query = format!(
            "WITH res AS (
                 INSERT INTO reservations
                     (first_name, last_name, email, phone, start_date, end_date, room_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING *
             )
             SELECT {COLUMNS} FROM res JOIN rooms rm ON rm.id = res.room_id"
        );
        let reservation = sqlx::query_as::<_, Reservation>(&query)
            .bind(input.guest.first_name.trim())
            .bind(input.guest.last_name.trim())
            .bind(input.guest.email.trim())
            .bind(input.guest.phone.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.room_id)
            .fetch_one(&mut **tx)
            .await?;

        let restriction = insert_booking_restriction(tx, &reservation).await?;
        Ok((reservation, restriction))
    }

    /// Find a reservation by ID, with its room name.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations res
             JOIN rooms rm ON rm.id = res.room_id
             WHERE res.id = $1"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reservations, arrival date ascending.
    pub async fn list(
        pool: &PgPool,
        filter: ReservationFilter,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let condition = match filter {
            ReservationFilter::All => "",
            ReservationFilter::New => "WHERE res.processed = false",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM reservations res
             JOIN rooms rm ON rm.id = res.room_id
             {condition}
             ORDER BY res.start_date, res.id"
        );
        sqlx::query_as::<_, Reservation>(&query).fetch_all(pool).await
    }

    /// Replace the guest contact fields. Returns `None` if no row matched.
    pub async fn update_guest(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGuest,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "WITH res AS (
                 UPDATE reservations SET
                     first_name = $2,
                     last_name = $3,
                     email = $4,
                     phone = $5
                 WHERE id = $1
                 RETURNING *
             )
             SELECT {COLUMNS} FROM res JOIN rooms rm ON rm.id = res.room_id"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(input.email.trim())
            .bind(input.phone.trim())
            .fetch_optional(pool)
            .await
    }

    /// Set the processed flag. Returns `true` if a row was updated.
    pub async fn set_processed(
        pool: &PgPool,
        id: DbId,
        processed: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE reservations SET processed = $2 WHERE id = $1")
            .bind(id)
            .bind(processed)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a reservation. Its restriction row goes with it via cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Insert the restriction row that holds the room for a new reservation.
async fn insert_booking_restriction(
    tx: &mut Transaction<'_, Postgres>,
    reservation: &Reservation,
) -> Result<RoomRestriction, sqlx::Error> {
    let input = CreateRoomRestriction {
        start_date: reservation.start_date,
        end_date: reservation.end_date,
        room_id: reservation.room_id,
        reservation_id: Some(reservation.id),
        restriction_id: RESTRICTION_RESERVATION,
    };
    RoomRestrictionRepo::create_inner(&mut **tx, &input).await
}
