//! Salesforce REST client for the churn event pipeline.
//!
//! Provides a lazily-authenticated, session-caching client over the
//! Salesforce REST API:
//!
//! - OAuth2 username-password grant with a single-flight session cache
//!   ([`auth`])
//! - typed SOQL queries for the records the enrichment pipeline consumes,
//!   with best-effort degradation for secondary sources ([`client`])
//! - churn write-backs: risk score updates and rep follow-up tasks
//!
//! The only retry behavior anywhere in the pipeline lives here: an
//! `INVALID_SESSION_ID` rejection invalidates the cached session and the
//! failed call runs once more against a fresh one.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{SalesforceAuth, SalesforceCredentials, Session};
pub use client::SalesforceClient;
pub use error::{SalesforceError, SalesforceResult};
pub use types::{
    Account, AccountOwner, Case, Contact, NewTask, Opportunity, QueryResponse, UsageMetrics,
};
