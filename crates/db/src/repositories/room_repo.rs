//! Repository for the `rooms` table.

use bookings_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::room::Room;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_name, created_at, updated_at";

/// Read access to room reference data.
pub struct RoomRepo;

impl RoomRepo {
    /// List every room, ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms ORDER BY id");
        sqlx::query_as::<_, Room>(&query).fetch_all(pool).await
    }

    /// Find a room by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rooms with no restriction overlapping `[start, end)`, ID ascending.
    pub async fn list_available(
        pool: &PgPool,
        start: Date,
        end: Date,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms r
             WHERE NOT EXISTS (
                 SELECT 1 FROM room_restrictions rr
                 WHERE rr.room_id = r.id
                   AND rr.start_date < $2
                   AND rr.end_date > $1
             )
             ORDER BY r.id"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
