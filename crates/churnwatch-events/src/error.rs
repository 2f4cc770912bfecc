//! Error types for webhook processing.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use churnwatch_salesforce::SalesforceError;

/// Errors surfaced by the webhook pipeline.
#[derive(Debug, Error)]
pub enum EventError {
    /// The inbound event carried no usable account id.
    #[error("Missing accountId")]
    MissingAccountId,

    /// The inbound body could not be decoded as an event.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Signature verification ran and failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// A mandatory Salesforce operation failed.
    #[error(transparent)]
    Salesforce(#[from] SalesforceError),

    /// The prediction service did not answer within the delivery budget.
    #[error("Churn prediction request timed out after {0:?}")]
    ForwardTimeout(Duration),

    /// The prediction service answered with a non-success status.
    #[error("Churn prediction service returned {status}: {body}")]
    ForwardRejected { status: u16, body: String },

    /// The prediction service could not be reached at all.
    #[error("Failed to reach churn prediction service: {0}")]
    ForwardConnect(String),

    /// Anything else that prevents processing.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            EventError::MissingAccountId => (StatusCode::BAD_REQUEST, "Missing accountId"),
            EventError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "Invalid payload"),
            EventError::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature"),
            EventError::Salesforce(_)
            | EventError::ForwardTimeout(_)
            | EventError::ForwardRejected { .. }
            | EventError::ForwardConnect(_)
            | EventError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process webhook")
            }
        };
        let body = ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result alias for webhook handlers.
pub type ApiResult<T> = Result<T, EventError>;
