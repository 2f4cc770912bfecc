//! Inbound Salesforce webhook handler.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::crypto;
use crate::error::{ApiResult, EventError};
use crate::router::EventsState;
use crate::types::{InboundEvent, WebhookAck};

/// Header carrying the sender's HMAC signature.
pub const SIGNATURE_HEADER: &str = "x-salesforce-signature";

/// `POST /webhooks/salesforce`: verify, enrich, forward, acknowledge.
pub async fn receive_salesforce_webhook(
    State(state): State<EventsState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    // Verification runs only when a secret is configured AND the request is
    // signed; either one missing skips the check, which is not the same
    // state as passing it.
    if let (Some(secret), Some(signature)) = (state.webhook_secret.as_deref(), signature) {
        if !crypto::verify_signature(&body, signature, secret) {
            warn!(target: "webhooks", "Rejected webhook with invalid signature");
            return Err(EventError::InvalidSignature);
        }
    }

    let event: InboundEvent = serde_json::from_value(body).map_err(|error| {
        warn!(
            target: "webhooks",
            %error,
            "Rejected webhook body that does not decode as an event"
        );
        EventError::InvalidPayload(error.to_string())
    })?;
    let Some(account_id) = event.account_id().map(ToOwned::to_owned) else {
        warn!(target: "webhooks", "Received webhook without an accountId");
        return Err(EventError::MissingAccountId);
    };

    info!(
        target: "webhooks",
        account_id = %account_id,
        event_type = event.event_type().unwrap_or("unknown"),
        "Processing Salesforce webhook"
    );

    let payload = state.enrichment.enrich(&account_id, &event).await?;
    state.forwarder.forward(&payload).await?;

    Ok(Json(WebhookAck {
        status: "received".to_string(),
        account_id,
        event_type: event.event_type().map(ToOwned::to_owned),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
