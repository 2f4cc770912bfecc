//! Delivery of enriched payloads to the churn prediction service.

use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use serde_json::Value;
use tracing::{error, info};

use crate::error::EventError;
use crate::types::EnrichedPayload;

/// Hard ceiling on one delivery attempt; there are no retries.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);
/// Downstream bodies are truncated to this length before capture.
const MAX_CAPTURED_BODY: usize = 4096;
const USER_AGENT: &str = "churnwatch-events/1.0";

/// POSTs enriched payloads to `{base_url}/predict`.
pub struct ForwardingService {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl ForwardingService {
    pub fn new(base_url: &str) -> Result<Self, EventError> {
        let http_client = reqwest::Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|e| EventError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(base_url, http_client, FORWARD_TIMEOUT))
    }

    /// Uses the provided HTTP client (for tests). `timeout` is the budget
    /// the client was built with; timeout errors report it.
    #[must_use]
    pub fn with_http_client(
        base_url: &str,
        http_client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            timeout,
        }
    }

    /// Delivers one payload and returns the prediction service's response
    /// body. Non-2xx answers fail with the downstream status and truncated
    /// body attached so the caller can surface them.
    pub async fn forward(&self, payload: &EnrichedPayload) -> Result<Value, EventError> {
        let url = format!("{}/predict", self.base_url);
        info!(
            target: "forwarder",
            account_id = %payload.account.id,
            url = %url,
            "Forwarding enriched payload to churn prediction service"
        );

        let started = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        let latency_ms = started.elapsed().as_millis() as u64;
        let status = response.status();

        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_CAPTURED_BODY)
                .collect();
            error!(
                target: "forwarder",
                account_id = %payload.account.id,
                status = status.as_u16(),
                latency_ms,
                body = %body,
                "Churn prediction service rejected payload"
            );
            return Err(EventError::ForwardRejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            target: "forwarder",
            account_id = %payload.account.id,
            status = status.as_u16(),
            latency_ms,
            "Forwarded payload to churn prediction service"
        );
        // The pipeline only needs delivery; a non-JSON ack is not a failure.
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    fn map_send_error(&self, error: &reqwest::Error) -> EventError {
        if error.is_timeout() {
            EventError::ForwardTimeout(self.timeout)
        } else if error.is_connect() {
            EventError::ForwardConnect(error.to_string())
        } else {
            EventError::Internal(format!("churn prediction request failed: {error}"))
        }
    }
}
