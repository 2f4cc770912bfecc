//! Typed client for the Salesforce REST API.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{SalesforceAuth, SalesforceCredentials};
use crate::error::{SalesforceError, SalesforceResult};
use crate::types::{
    Account, Case, Contact, CreateRecordResponse, NewTask, Opportunity, QueryResponse,
    UsageMetrics,
};

const API_VERSION: &str = "v59.0";
const USER_AGENT: &str = "churnwatch-salesforce/1.0";

/// Client for account enrichment queries and churn write-backs.
///
/// The account lookup is mandatory and fails loudly; the related-record
/// queries are best-effort and degrade to empty results so one flaky
/// secondary source cannot abort an enrichment. Any operation that hits an
/// `INVALID_SESSION_ID` rejection drops the cached session and retries once
/// against a fresh one.
#[derive(Debug, Clone)]
pub struct SalesforceClient {
    auth: SalesforceAuth,
    http_client: reqwest::Client,
}

impl SalesforceClient {
    /// Creates a client with its own HTTP client bounded by `timeout`.
    pub fn new(credentials: SalesforceCredentials, timeout: Duration) -> SalesforceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SalesforceError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(credentials, http_client))
    }

    /// Creates a client using the provided HTTP client (for tests).
    #[must_use]
    pub fn with_http_client(
        credentials: SalesforceCredentials,
        http_client: reqwest::Client,
    ) -> Self {
        let auth = SalesforceAuth::new(credentials, http_client.clone());
        Self { auth, http_client }
    }

    /// Fetches one account by id. Errors with [`SalesforceError::NotFound`]
    /// when the query matches no rows.
    pub async fn get_account(&self, account_id: &str) -> SalesforceResult<Account> {
        let soql = format!(
            "SELECT Id, Name, Industry, AnnualRevenue, Annual_Contract_Value__c, \
             Contract_Start_Date__c, Contract_End_Date__c, Account_Status__c, Type, \
             OwnerId, Owner.Name, Owner.Email, Owner.Phone \
             FROM Account WHERE Id = '{}'",
            escape_soql_literal(account_id)
        );
        let response: QueryResponse<Account> = self.query(&soql).await?;
        response
            .records
            .into_iter()
            .next()
            .ok_or_else(|| SalesforceError::NotFound(account_id.to_string()))
    }

    /// Fetches the account's contacts. Best-effort: any failure logs at WARN
    /// and yields an empty list.
    pub async fn get_contacts(&self, account_id: &str) -> Vec<Contact> {
        let soql = format!(
            "SELECT Id, Name, Email, Phone, Title, Primary_Contact__c \
             FROM Contact WHERE AccountId = '{}'",
            escape_soql_literal(account_id)
        );
        match self.query::<Contact>(&soql).await {
            Ok(response) => response.records,
            Err(error) => {
                warn!(
                    target: "salesforce",
                    account_id = %account_id,
                    error = %error,
                    "Contact query failed; continuing without contacts"
                );
                Vec::new()
            }
        }
    }

    /// Fetches cases created within the last `days` days, newest first.
    /// Best-effort; empty on failure.
    pub async fn get_recent_cases(&self, account_id: &str, days: u32) -> Vec<Case> {
        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let soql = format!(
            "SELECT Id, CaseNumber, Subject, Status, Priority, CreatedDate, \
             IsClosed, IsEscalated \
             FROM Case WHERE AccountId = '{}' AND CreatedDate >= {cutoff} \
             ORDER BY CreatedDate DESC",
            escape_soql_literal(account_id)
        );
        match self.query::<Case>(&soql).await {
            Ok(response) => response.records,
            Err(error) => {
                warn!(
                    target: "salesforce",
                    account_id = %account_id,
                    error = %error,
                    "Case query failed; continuing without recent cases"
                );
                Vec::new()
            }
        }
    }

    /// Fetches the account's open opportunities ordered by close date.
    /// Best-effort; empty on failure.
    pub async fn get_open_opportunities(&self, account_id: &str) -> Vec<Opportunity> {
        let soql = format!(
            "SELECT Id, Name, StageName, Amount, CloseDate, Probability, Type \
             FROM Opportunity WHERE AccountId = '{}' AND IsClosed = false \
             ORDER BY CloseDate ASC",
            escape_soql_literal(account_id)
        );
        match self.query::<Opportunity>(&soql).await {
            Ok(response) => response.records,
            Err(error) => {
                warn!(
                    target: "salesforce",
                    account_id = %account_id,
                    error = %error,
                    "Opportunity query failed; continuing without opportunities"
                );
                Vec::new()
            }
        }
    }

    /// Fetches the newest usage metrics record for the account, or `None`
    /// when there is none. `Usage_Metrics__c` is a custom object that many
    /// orgs do not have, so every failure here is an expected outcome and
    /// logs at INFO.
    pub async fn get_usage_metrics(&self, account_id: &str) -> Option<UsageMetrics> {
        let soql = format!(
            "SELECT Id, Last_Login_Date__c, Active_Users__c, Total_Users__c, \
             Feature_Usage_Score__c, Usage_Trend__c \
             FROM Usage_Metrics__c WHERE Account__c = '{}' \
             ORDER BY CreatedDate DESC LIMIT 1",
            escape_soql_literal(account_id)
        );
        match self.query::<UsageMetrics>(&soql).await {
            Ok(response) => response.records.into_iter().next(),
            Err(error) => {
                info!(
                    target: "salesforce",
                    account_id = %account_id,
                    error = %error,
                    "Usage metrics not available for this account"
                );
                None
            }
        }
    }

    /// Writes the evaluated churn risk back onto the account record.
    pub async fn update_risk_score(
        &self,
        account_id: &str,
        score: f64,
        level: &str,
        factors: &[String],
    ) -> SalesforceResult<()> {
        let body = serde_json::json!({
            "Churn_Risk_Score__c": score,
            "Churn_Risk_Level__c": level,
            "Churn_Risk_Factors__c": factors.join("; "),
            "Last_Churn_Evaluation__c": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.sobject_update("Account", account_id, &body).await?;
        info!(
            target: "salesforce",
            account_id = %account_id,
            score = score,
            level = %level,
            "Updated churn risk on account"
        );
        Ok(())
    }

    /// Creates a follow-up Task against an account, returning the new
    /// record's id.
    pub async fn create_task(&self, task: NewTask) -> SalesforceResult<String> {
        let mut body = serde_json::json!({
            "Subject": task.subject,
            "Description": task.description,
            "WhatId": task.what_id,
            "Status": "Open",
            "Priority": task.priority.as_deref().unwrap_or("High"),
            "ActivityDate": task
                .due_date
                .clone()
                .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
        });
        if let Some(owner_id) = &task.owner_id {
            body["OwnerId"] = Value::String(owner_id.clone());
        }
        let created = self.sobject_create("Task", &body).await?;
        info!(
            target: "salesforce",
            account_id = %task.what_id,
            task_id = %created.id,
            "Created follow-up task"
        );
        Ok(created.id)
    }

    async fn query<T: DeserializeOwned>(&self, soql: &str) -> SalesforceResult<QueryResponse<T>> {
        match self.query_once(soql).await {
            Err(SalesforceError::SessionExpired) => {
                debug!(target: "salesforce", "Session rejected; re-authenticating and retrying query");
                self.auth.invalidate().await;
                self.query_once(soql).await
            }
            other => other,
        }
    }

    async fn query_once<T: DeserializeOwned>(
        &self,
        soql: &str,
    ) -> SalesforceResult<QueryResponse<T>> {
        let session = self.auth.get_session().await?;
        let url = format!("{}/services/data/{API_VERSION}/query", session.instance_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", soql)])
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        response
            .json::<QueryResponse<T>>()
            .await
            .map_err(|e| SalesforceError::Parse(format!("query response: {e}")))
    }

    async fn sobject_update(
        &self,
        sobject: &str,
        record_id: &str,
        body: &Value,
    ) -> SalesforceResult<()> {
        match self.sobject_update_once(sobject, record_id, body).await {
            Err(SalesforceError::SessionExpired) => {
                debug!(target: "salesforce", "Session rejected; re-authenticating and retrying update");
                self.auth.invalidate().await;
                self.sobject_update_once(sobject, record_id, body).await
            }
            other => other,
        }
    }

    async fn sobject_update_once(
        &self,
        sobject: &str,
        record_id: &str,
        body: &Value,
    ) -> SalesforceResult<()> {
        let session = self.auth.get_session().await?;
        let url = format!(
            "{}/services/data/{API_VERSION}/sobjects/{sobject}/{record_id}",
            session.instance_url
        );
        let response = self
            .http_client
            .patch(&url)
            .bearer_auth(&session.access_token)
            .json(body)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn sobject_create(
        &self,
        sobject: &str,
        body: &Value,
    ) -> SalesforceResult<CreateRecordResponse> {
        match self.sobject_create_once(sobject, body).await {
            Err(SalesforceError::SessionExpired) => {
                debug!(target: "salesforce", "Session rejected; re-authenticating and retrying create");
                self.auth.invalidate().await;
                self.sobject_create_once(sobject, body).await
            }
            other => other,
        }
    }

    async fn sobject_create_once(
        &self,
        sobject: &str,
        body: &Value,
    ) -> SalesforceResult<CreateRecordResponse> {
        let session = self.auth.get_session().await?;
        let url = format!(
            "{}/services/data/{API_VERSION}/sobjects/{sobject}",
            session.instance_url
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&session.access_token)
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        response
            .json::<CreateRecordResponse>()
            .await
            .map_err(|e| SalesforceError::Parse(format!("create response: {e}")))
    }

    /// Maps a failed API response to an error, recognizing session expiry
    /// from the `INVALID_SESSION_ID` error code.
    async fn error_from_response(response: reqwest::Response) -> SalesforceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let errors: Vec<crate::types::ApiErrorBody> =
            serde_json::from_str(&body).unwrap_or_default();
        if errors.iter().any(|e| e.error_code == "INVALID_SESSION_ID") {
            return SalesforceError::SessionExpired;
        }
        let (error_code, message) = match errors.into_iter().next() {
            Some(e) => (e.error_code, e.message),
            None => ("UNKNOWN".to_string(), body.chars().take(256).collect()),
        };
        SalesforceError::Api {
            status: status.as_u16(),
            error_code,
            message,
        }
    }
}

/// Escapes a string for interpolation into a single-quoted SOQL literal.
fn escape_soql_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
