//! HTTP handlers for inbound webhooks.

pub mod salesforce;

pub use salesforce::{receive_salesforce_webhook, SIGNATURE_HEADER};
