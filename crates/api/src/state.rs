use std::sync::Arc;

use bookings_db::store::{ReservationStore, Store, UserStore};
use bookings_events::MailDispatcher;

use crate::booking::{AvailabilityEngine, CalendarAggregator, Notifier, ReservationWorkflow};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Rooms and reservations (admin screens, room lookups).
    pub reservations: Arc<dyn ReservationStore>,
    /// Admin accounts.
    pub users: Arc<dyn UserStore>,
    pub availability: AvailabilityEngine,
    pub workflow: ReservationWorkflow,
    pub calendar: CalendarAggregator,
}

impl AppState {
    /// Wire every service to one backing store and the mail queue.
    pub fn new<S: Store>(config: ServerConfig, store: Arc<S>, mailer: MailDispatcher) -> Self {
        let availability = AvailabilityEngine::new(store.clone());
        let notifier = Notifier::new(mailer, &config.mail_from, &config.owner_email);
        let workflow = ReservationWorkflow::new(store.clone(), availability.clone(), notifier);
        let calendar = CalendarAggregator::new(store.clone(), store.clone());

        Self {
            config: Arc::new(config),
            reservations: store.clone(),
            users: store,
            availability,
            workflow,
            calendar,
        }
    }
}
