//! Webhook ingestion, enrichment, and forwarding for the churn pipeline.
//!
//! The crate implements the full path an inbound Salesforce event takes:
//!
//! 1. optional HMAC signature verification ([`crypto`])
//! 2. typed event parsing with open passthrough fields ([`types`])
//! 3. multi-source CRM enrichment with partial-failure tolerance
//!    ([`services::enrichment_service`])
//! 4. delivery to the churn prediction service with a bounded timeout
//!    ([`services::forwarding_service`])
//!
//! [`events_router`] wires the pipeline behind `POST /webhooks/salesforce`;
//! the binary crate mounts it next to its health route.

pub mod crypto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod services;
pub mod types;

pub use error::{ApiResult, ErrorResponse, EventError};
pub use router::{events_router, EventsState};
pub use services::{EnrichmentService, ForwardingService, FORWARD_TIMEOUT};
pub use types::{EnrichedPayload, InboundEvent, WebhookAck};
