//! Environment-driven configuration, loaded once at startup.

use std::env;
use std::fmt;

use thiserror::Error;

use churnwatch_salesforce::SalesforceCredentials;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub salesforce: SalesforceSettings,
    /// Shared secret for webhook signatures; unset disables verification.
    pub webhook_secret: Option<String>,
    pub prediction_url: String,
    pub case_lookback_days: u32,
}

/// Salesforce connection settings.
#[derive(Clone)]
pub struct SalesforceSettings {
    pub login_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub security_token: String,
    pub timeout_secs: u64,
}

impl SalesforceSettings {
    pub fn credentials(&self) -> SalesforceCredentials {
        SalesforceCredentials {
            login_url: self.login_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            security_token: self.security_token.clone(),
        }
    }
}

impl fmt::Debug for SalesforceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesforceSettings")
            .field("login_url", &self.login_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("security_token", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Loads configuration from the environment (and `.env` if present).
    /// Required variables abort with an error; optional ones fall back to
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("EVENT_LISTENER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "EVENT_LISTENER_PORT".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let salesforce = SalesforceSettings {
            login_url: env::var("SALESFORCE_LOGIN_URL")
                .unwrap_or_else(|_| "https://login.salesforce.com".to_string()),
            client_id: require_var("SALESFORCE_CLIENT_ID")?,
            client_secret: require_var("SALESFORCE_CLIENT_SECRET")?,
            username: require_var("SALESFORCE_USERNAME")?,
            password: require_var("SALESFORCE_PASSWORD")?,
            security_token: env::var("SALESFORCE_SECURITY_TOKEN").unwrap_or_default(),
            timeout_secs: env::var("SALESFORCE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        };

        let webhook_secret = env::var("SALESFORCE_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        let prediction_url = env::var("CHURN_PREDICTION_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());
        let case_lookback_days = env::var("CASE_LOOKBACK_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            rust_log,
            salesforce,
            webhook_secret,
            prediction_url,
            case_lookback_days,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
