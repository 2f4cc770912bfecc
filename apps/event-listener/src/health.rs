//! Liveness endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const SERVICE_NAME: &str = "event-listener";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

/// `GET /health`; answers without touching Salesforce or the prediction
/// service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_service_identity() {
        let Json(body) = health_handler().await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "event-listener");
    }

    #[test]
    fn health_serializes_expected_fields() {
        let value = serde_json::to_value(HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
            timestamp: "2026-08-01T00:00:00.000Z".to_string(),
        })
        .unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "event-listener");
        assert!(value["timestamp"].is_string());
    }
}
