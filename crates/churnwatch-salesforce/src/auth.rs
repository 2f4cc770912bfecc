//! Session management for the Salesforce REST API.
//!
//! Sessions are established lazily with the OAuth2 username-password grant
//! and cached for the lifetime of the process. The cache lock is held across
//! the login round-trip so concurrent first-users queue behind a single
//! establishment attempt instead of racing to create duplicate sessions.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{SalesforceError, SalesforceResult};

/// Credentials for the OAuth2 username-password grant.
#[derive(Clone)]
pub struct SalesforceCredentials {
    /// Login host, e.g. `https://login.salesforce.com`.
    pub login_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    /// Org security token; appended to the password. May be empty when the
    /// caller's IP range is trusted.
    pub security_token: String,
}

impl fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("login_url", &self.login_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .finish()
    }
}

/// An established API session.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    /// Instance host all subsequent API calls go to, e.g.
    /// `https://acme.my.salesforce.com`.
    pub instance_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    instance_url: String,
}

/// Shared session cache; cheap to clone.
#[derive(Clone)]
pub struct SalesforceAuth {
    credentials: SalesforceCredentials,
    http_client: reqwest::Client,
    session: Arc<Mutex<Option<Session>>>,
}

impl SalesforceAuth {
    pub fn new(credentials: SalesforceCredentials, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            http_client,
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the cached session, establishing one if none exists.
    pub async fn get_session(&self) -> SalesforceResult<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let session = self.login().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Drops the cached session; the next call to [`get_session`]
    /// re-authenticates.
    ///
    /// [`get_session`]: Self::get_session
    pub async fn invalidate(&self) {
        let mut guard = self.session.lock().await;
        if guard.take().is_some() {
            debug!(target: "salesforce", "Cached session invalidated");
        }
    }

    async fn login(&self) -> SalesforceResult<Session> {
        info!(
            target: "salesforce",
            login_url = %self.credentials.login_url,
            username = %self.credentials.username,
            "Connecting to Salesforce"
        );

        let url = format!(
            "{}/services/oauth2/token",
            self.credentials.login_url.trim_end_matches('/')
        );
        let password = format!(
            "{}{}",
            self.credentials.password, self.credentials.security_token
        );
        let params = [
            ("grant_type", "password"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", password.as_str()),
        ];

        let response = self.http_client.post(&url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(256).collect();
            return Err(SalesforceError::Auth(format!("{status}: {detail}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SalesforceError::Parse(format!("token response: {e}")))?;

        let session = Session {
            access_token: token.access_token,
            instance_url: token.instance_url.trim_end_matches('/').to_string(),
        };
        info!(
            target: "salesforce",
            instance_url = %session.instance_url,
            "Connected to Salesforce"
        );
        Ok(session)
    }
}

impl fmt::Debug for SalesforceAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesforceAuth")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SalesforceCredentials {
        SalesforceCredentials {
            login_url: "https://login.salesforce.com".to_string(),
            client_id: "client-id".to_string(),
            client_secret: "s3cret".to_string(),
            username: "integration@example.com".to_string(),
            password: "hunter2".to_string(),
            security_token: "tok123".to_string(),
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let output = format!("{:?}", credentials());
        assert!(output.contains("integration@example.com"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("s3cret"));
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("tok123"));
    }

    #[test]
    fn auth_debug_redacts_secrets() {
        let auth = SalesforceAuth::new(credentials(), reqwest::Client::new());
        let output = format!("{auth:?}");
        assert!(!output.contains("hunter2"));
    }
}
