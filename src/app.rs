//! HTTP wiring: builds every service over one store and broker and mounts the routes.

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use std::sync::Arc;

use crate::booking::{self, BookingService};
use crate::broadcast::{self, Broadcaster, Broker};
use crate::hospital::{self, HospitalService};
use crate::queue::{self, VirtualQueue};
use crate::search::types::PageLimits;
use crate::search::{self, SearchEngine};
use crate::store::Store;

/// The service layer shared by every handler. All members are cheap clones.
#[derive(Clone)]
pub struct Services {
    pub hospitals: HospitalService,
    pub search: SearchEngine,
    pub queue: VirtualQueue,
    pub bookings: BookingService,
    pub broadcaster: Broadcaster,
}

impl Services {
    pub fn new(
        store: Arc<dyn Store>,
        broker: Arc<dyn Broker>,
        limits: PageLimits,
        queue_max_wait: chrono::Duration,
    ) -> Self {
        let broadcaster = Broadcaster::new(broker);
        Self {
            hospitals: HospitalService::new(store.clone(), broadcaster.clone()),
            search: SearchEngine::new(store.clone(), limits),
            queue: VirtualQueue::new(store.clone(), broadcaster.clone(), queue_max_wait),
            bookings: BookingService::new(store, broadcaster.clone()),
            broadcaster,
        }
    }
}

pub fn router(services: &Services) -> Router {
    Router::new()
        .route("/api/hospitals/search", get(search::handlers::handle_search))
        .route("/api/hospitals/suggest", get(search::handlers::handle_suggest))
        .route("/api/hospitals/register", post(hospital::handlers::handle_register))
        .route("/api/hospitals/:id", get(hospital::handlers::handle_get_hospital))
        .route(
            "/api/hospitals/:id/inventory",
            put(hospital::handlers::handle_update_inventory),
        )
        .route(
            "/api/hospitals/:id/er-wait-times",
            put(hospital::handlers::handle_update_er_wait_times),
        )
        .route(
            "/api/hospitals/:id/verification",
            put(hospital::handlers::handle_set_verification),
        )
        .route(
            "/api/hospitals/:id/ratings",
            post(hospital::handlers::handle_submit_rating),
        )
        .route(
            "/api/hospitals/:id/bookings",
            get(booking::handlers::handle_list_for_hospital),
        )
        .route(
            "/api/hospitals/:id/queue",
            get(queue::handlers::handle_board).post(queue::handlers::handle_join_queue),
        )
        .route("/api/queue/:entry_id", get(queue::handlers::handle_get_entry))
        .route(
            "/api/queue/:entry_id/status",
            put(queue::handlers::handle_update_status),
        )
        .route("/api/bookings", post(booking::handlers::handle_create_booking))
        .route(
            "/api/bookings/:id/status",
            put(booking::handlers::handle_update_status),
        )
        .route("/ws", get(broadcast::handlers::handle_subscribe))
        .layer(Extension(services.hospitals.clone()))
        .layer(Extension(services.search.clone()))
        .layer(Extension(services.queue.clone()))
        .layer(Extension(services.bookings.clone()))
        .layer(Extension(services.broadcaster.broker()))
}
