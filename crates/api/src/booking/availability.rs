//! Which rooms are free for a stay.

use std::sync::Arc;

use bookings_core::stay::StayDates;
use bookings_core::types::DbId;
use bookings_db::models::room::Room;
use bookings_db::store::{AvailabilityStore, StoreError};

/// Answers availability questions for validated stays.
///
/// Store failures (including timeouts) are surfaced, never retried.
#[derive(Clone)]
pub struct AvailabilityEngine {
    store: Arc<dyn AvailabilityStore>,
}

impl AvailabilityEngine {
    pub fn new(store: Arc<dyn AvailabilityStore>) -> Self {
        Self { store }
    }

    /// True iff no restriction on the room overlaps the stay.
    pub async fn room_is_available(
        &self,
        room_id: DbId,
        stay: &StayDates,
    ) -> Result<bool, StoreError> {
        let available = self
            .store
            .room_is_available(room_id, stay.start(), stay.end())
            .await?;
        tracing::debug!(
            room_id,
            start = %stay.start(),
            end = %stay.end(),
            available,
            "Checked room availability"
        );
        Ok(available)
    }

    /// Every room free for the whole stay, ID ascending.
    pub async fn available_rooms(&self, stay: &StayDates) -> Result<Vec<Room>, StoreError> {
        let rooms = self.store.available_rooms(stay.start(), stay.end()).await?;
        tracing::debug!(
            start = %stay.start(),
            end = %stay.end(),
            count = rooms.len(),
            "Searched availability"
        );
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use bookings_core::guest::GuestDetails;
    use bookings_db::models::reservation::CreateReservation;
    use bookings_db::store::{MemoryStore, ReservationStore};

    use super::*;

    async fn store_with_booking() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let stay = StayDates::parse("2025-01-10", "2025-01-15").unwrap();
        store
            .create_reservation(&CreateReservation {
                guest: GuestDetails {
                    first_name: "Joe".into(),
                    last_name: "Joyson".into(),
                    email: "joe@example.com".into(),
                    phone: "555".into(),
                },
                room_id: 1,
                start_date: stay.start(),
                end_date: stay.end(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn half_open_boundary_scenario() {
        let engine = AvailabilityEngine::new(store_with_booking().await);

        let inside = StayDates::parse("2025-01-12", "2025-01-13").unwrap();
        assert!(!engine.room_is_available(1, &inside).await.unwrap());

        let checkout_day = StayDates::parse("2025-01-15", "2025-01-16").unwrap();
        assert!(engine.room_is_available(1, &checkout_day).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_queries_agree() {
        let engine = AvailabilityEngine::new(store_with_booking().await);
        let stay = StayDates::parse("2025-01-14", "2025-01-20").unwrap();

        let first = engine.available_rooms(&stay).await.unwrap();
        let second = engine.available_rooms(&stay).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[tokio::test]
    async fn store_failures_surface() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let engine = AvailabilityEngine::new(store);
        let stay = StayDates::parse("2025-01-01", "2025-01-02").unwrap();
        assert!(matches!(
            engine.available_rooms(&stay).await,
            Err(StoreError::Timeout(_))
        ));
    }
}
