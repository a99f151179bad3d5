//! Repository for the `room_restrictions` table.

use bookings_core::restriction::RESTRICTION_OWNER_BLOCK;
use bookings_core::types::{Date, DbId};
use chrono::Days;
use sqlx::PgPool;

use crate::models::room_restriction::{CreateRoomRestriction, RoomRestriction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, start_date, end_date, room_id, reservation_id, restriction_id, \
                        created_at, updated_at";

/// Provides availability queries and block management for room restrictions.
pub struct RoomRestrictionRepo;

impl RoomRestrictionRepo {
    /// Insert a restriction row, returning it.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRoomRestriction,
    ) -> Result<RoomRestriction, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_inner(&mut conn, input).await
    }

    /// Insert a restriction on an existing connection or open transaction.
    pub(crate) async fn create_inner(
        conn: &mut sqlx::PgConnection,
        input: &CreateRoomRestriction,
    ) -> Result<RoomRestriction, sqlx::Error> {
        let query = format!(
            "INSERT INTO room_restrictions
                (start_date, end_date, room_id, reservation_id, restriction_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoomRestriction>(&query)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.room_id)
            .bind(input.reservation_id)
            .bind(input.restriction_id)
            .fetch_one(conn)
            .await
    }

    /// True when no restriction for `room_id` overlaps `[start, end)`.
    pub async fn room_is_available(
        pool: &PgPool,
        room_id: DbId,
        start: Date,
        end: Date,
    ) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(id) FROM room_restrictions
             WHERE room_id = $1 AND start_date < $3 AND end_date > $2",
        )
        .bind(room_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
        Ok(row.0 == 0)
    }

    /// Restrictions for a room touching the closed interval `[first, last]`.
    pub async fn list_for_room_between(
        pool: &PgPool,
        room_id: DbId,
        first: Date,
        last: Date,
    ) -> Result<Vec<RoomRestriction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM room_restrictions
             WHERE room_id = $1 AND start_date <= $3 AND end_date > $2
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, RoomRestriction>(&query)
            .bind(room_id)
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
    }

    /// Place a one-night owner block `[day, day + 1)` on a room.
    pub async fn insert_block(
        pool: &PgPool,
        room_id: DbId,
        day: Date,
    ) -> Result<RoomRestriction, sqlx::Error> {
        let end_date = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| sqlx::Error::Protocol(format!("block day {day} out of range")))?;
        let input = CreateRoomRestriction {
            start_date: day,
            end_date,
            room_id,
            reservation_id: None,
            restriction_id: RESTRICTION_OWNER_BLOCK,
        };
        Self::create(pool, &input).await
    }

    /// Delete an owner block. Booking-originated rows are never touched.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_block(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM room_restrictions WHERE id = $1 AND reservation_id IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
