//! Business services for the webhook pipeline.

pub mod enrichment_service;
pub mod forwarding_service;

pub use enrichment_service::EnrichmentService;
pub use forwarding_service::{ForwardingService, FORWARD_TIMEOUT};
