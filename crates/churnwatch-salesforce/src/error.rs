//! Error types for Salesforce API operations.

use thiserror::Error;

/// Errors that can occur when talking to Salesforce.
#[derive(Debug, Error)]
pub enum SalesforceError {
    /// Client-side configuration problem (bad URL, client build failure).
    #[error("Salesforce configuration error: {0}")]
    Config(String),

    /// The OAuth2 token request was rejected.
    #[error("Salesforce authentication failed: {0}")]
    Auth(String),

    /// The cached session was rejected by the API and must be re-established.
    #[error("Salesforce session expired")]
    SessionExpired,

    /// A lookup for a specific record returned no rows.
    #[error("Account {0} not found")]
    NotFound(String),

    /// The API returned an error response.
    #[error("Salesforce API error ({status} {error_code}): {message}")]
    Api {
        status: u16,
        error_code: String,
        message: String,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("Salesforce request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Failed to parse Salesforce response: {0}")]
    Parse(String),
}

/// Result alias for Salesforce operations.
pub type SalesforceResult<T> = Result<T, SalesforceError>;
