//! Salesforce record types.
//!
//! Field names mirror the Salesforce REST API (PascalCase standard fields,
//! `__c` suffixes for custom fields); dates and datetimes are kept as the
//! strings Salesforce returns since they pass through to the enriched
//! payload unmodified.

use serde::{Deserialize, Serialize};

/// An Account record with the fields the enrichment pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "AnnualRevenue")]
    pub annual_revenue: Option<f64>,
    #[serde(rename = "Annual_Contract_Value__c")]
    pub contract_value: Option<f64>,
    /// Contract start date as `YYYY-MM-DD`; source for tenure derivation.
    #[serde(rename = "Contract_Start_Date__c")]
    pub contract_start_date: Option<String>,
    #[serde(rename = "Contract_End_Date__c")]
    pub contract_end_date: Option<String>,
    #[serde(rename = "Account_Status__c")]
    pub status: Option<String>,
    #[serde(rename = "Type")]
    pub account_type: Option<String>,
    #[serde(rename = "OwnerId")]
    pub owner_id: Option<String>,
    /// Relationship fields from the `Owner.Name, Owner.Email, Owner.Phone`
    /// projection; the account rep in the enriched payload.
    #[serde(rename = "Owner")]
    pub owner: Option<AccountOwner>,
}

/// Projected fields of the Account owner (the account rep).
#[derive(Debug, Clone, Deserialize)]
pub struct AccountOwner {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

/// A Contact belonging to an Account.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Primary_Contact__c")]
    pub is_primary: Option<bool>,
}

/// A support Case. `is_closed`/`is_escalated` default to `false` when the
/// org omits them so summary counts stay well-defined.
#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "CaseNumber")]
    pub case_number: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Priority")]
    pub priority: Option<String>,
    #[serde(rename = "CreatedDate")]
    pub created_date: Option<String>,
    #[serde(rename = "IsClosed", default)]
    pub is_closed: bool,
    #[serde(rename = "IsEscalated", default)]
    pub is_escalated: bool,
}

/// An open Opportunity.
#[derive(Debug, Clone, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "StageName")]
    pub stage: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<f64>,
    #[serde(rename = "CloseDate")]
    pub close_date: Option<String>,
    #[serde(rename = "Probability")]
    pub probability: Option<f64>,
    #[serde(rename = "Type")]
    pub opportunity_type: Option<String>,
}

/// The newest `Usage_Metrics__c` record for an account. The object is a
/// custom install and may not exist in a given org at all.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageMetrics {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Last_Login_Date__c")]
    pub last_login_date: Option<String>,
    #[serde(rename = "Active_Users__c")]
    pub active_users: Option<f64>,
    #[serde(rename = "Total_Users__c")]
    pub total_users: Option<f64>,
    #[serde(rename = "Feature_Usage_Score__c")]
    pub feature_usage_score: Option<f64>,
    #[serde(rename = "Usage_Trend__c")]
    pub usage_trend: Option<String>,
}

/// Envelope returned by the `query` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse<T> {
    #[serde(rename = "totalSize", default)]
    pub total_size: i64,
    #[serde(default)]
    pub done: bool,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// A new Task to create against an account, assigned to its rep.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub subject: String,
    pub description: String,
    /// Record the task is attached to (the account id).
    pub what_id: String,
    /// Assignee; the account's `OwnerId`.
    pub owner_id: Option<String>,
    /// Defaults to `"High"` when not set.
    pub priority: Option<String>,
    /// `YYYY-MM-DD`; defaults to today when not set.
    pub due_date: Option<String>,
}

/// Body returned by `sobjects` create calls.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordResponse {
    pub id: String,
    #[serde(default)]
    pub success: bool,
}

/// One element of the error array Salesforce returns on failed calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "errorCode", default)]
    pub error_code: String,
}
