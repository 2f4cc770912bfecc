//! Router assembly for the events API.

use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::handlers::receive_salesforce_webhook;
use crate::services::{EnrichmentService, ForwardingService};

/// Shared state for webhook handling.
#[derive(Clone)]
pub struct EventsState {
    pub enrichment: Arc<EnrichmentService>,
    pub forwarder: Arc<ForwardingService>,
    /// Shared secret for signature checks; `None` disables verification.
    pub webhook_secret: Option<String>,
}

impl EventsState {
    pub fn new(
        enrichment: Arc<EnrichmentService>,
        forwarder: Arc<ForwardingService>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            enrichment,
            forwarder,
            webhook_secret,
        }
    }
}

/// Builds the webhook router.
pub fn events_router(state: EventsState) -> Router {
    Router::new()
        .route("/webhooks/salesforce", post(receive_salesforce_webhook))
        .with_state(state)
}
