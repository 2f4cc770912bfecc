//! Wire types for inbound events and the enriched payload.
//!
//! The enriched payload is camelCase on the wire; the digest shapes mirror
//! what the churn prediction service consumes, not the raw Salesforce field
//! names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use churnwatch_salesforce::{Account, AccountOwner, Case, Contact, Opportunity, UsageMetrics};

/// An inbound webhook event.
///
/// Salesforce flows have emitted both `accountId` and `AccountId`, and both
/// `eventType` and `type`, depending on how the outbound message was built;
/// the lowercase spellings win when both are present and non-empty. Every
/// unrecognized field is retained in [`details`](Self::details) and travels
/// with the enriched payload untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "accountId")]
    account_id: Option<String>,
    #[serde(rename = "AccountId")]
    account_id_legacy: Option<String>,
    #[serde(rename = "eventType")]
    event_type: Option<String>,
    #[serde(rename = "type")]
    event_type_legacy: Option<String>,
    timestamp: Option<String>,
    trigger: Option<String>,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl InboundEvent {
    /// The id of the account this event concerns. Empty strings count as
    /// missing.
    pub fn account_id(&self) -> Option<&str> {
        non_empty(self.account_id.as_deref()).or_else(|| non_empty(self.account_id_legacy.as_deref()))
    }

    /// The event type, if the sender named one.
    pub fn event_type(&self) -> Option<&str> {
        non_empty(self.event_type.as_deref()).or_else(|| non_empty(self.event_type_legacy.as_deref()))
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    /// Fields beyond the recognized ones, passed through verbatim.
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Acknowledgment returned to the webhook sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub status: String,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub timestamp: String,
}

/// The payload forwarded to the churn prediction service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPayload {
    pub event: EventSummary,
    pub account: AccountSummary,
    pub contacts: Vec<ContactSummary>,
    pub recent_activity: RecentActivity,
    pub account_rep: AccountRep,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub timestamp: String,
    pub trigger: String,
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub annual_revenue: Option<f64>,
    pub contract_value: Option<f64>,
    pub contract_start_date: Option<String>,
    pub contract_end_date: Option<String>,
    /// Whole months since contract start; `None` when no usable start date.
    pub tenure_months: Option<i32>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

impl AccountSummary {
    /// Maps the raw record, attaching the derived tenure.
    pub fn from_account(account: &Account, tenure_months: Option<i32>) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            industry: account.industry.clone(),
            annual_revenue: account.annual_revenue,
            contract_value: account.contract_value,
            contract_start_date: account.contract_start_date.clone(),
            contract_end_date: account.contract_end_date.clone(),
            tenure_months,
            status: account.status.clone(),
            account_type: account.account_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub is_primary: Option<bool>,
}

impl From<&Contact> for ContactSummary {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            title: contact.title.clone(),
            is_primary: contact.is_primary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub support_tickets: SupportTicketSummary,
    pub opportunities: Vec<OpportunityDigest>,
    /// `null` on the wire when the org records no usage metrics.
    pub usage_metrics: Option<UsageMetricsDigest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicketSummary {
    pub total: usize,
    pub open: usize,
    pub escalated: usize,
    pub cases: Vec<CaseDigest>,
}

impl SupportTicketSummary {
    /// Counts and digests a window of cases. `total` is always the window
    /// size; `open` counts cases not yet closed; `escalated` counts
    /// escalations regardless of closed state.
    pub fn from_cases(cases: &[Case]) -> Self {
        Self {
            total: cases.len(),
            open: cases.iter().filter(|c| !c.is_closed).count(),
            escalated: cases.iter().filter(|c| c.is_escalated).count(),
            cases: cases.iter().map(CaseDigest::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDigest {
    pub id: String,
    pub subject: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub created_date: Option<String>,
    pub is_escalated: bool,
}

impl From<&Case> for CaseDigest {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id.clone(),
            subject: case.subject.clone(),
            status: case.status.clone(),
            priority: case.priority.clone(),
            created_date: case.created_date.clone(),
            is_escalated: case.is_escalated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDigest {
    pub id: String,
    pub name: Option<String>,
    pub stage: Option<String>,
    pub amount: Option<f64>,
    pub close_date: Option<String>,
    pub probability: Option<f64>,
    #[serde(rename = "type")]
    pub opportunity_type: Option<String>,
}

impl From<&Opportunity> for OpportunityDigest {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            id: opportunity.id.clone(),
            name: opportunity.name.clone(),
            stage: opportunity.stage.clone(),
            amount: opportunity.amount,
            close_date: opportunity.close_date.clone(),
            probability: opportunity.probability,
            opportunity_type: opportunity.opportunity_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetricsDigest {
    pub last_login_date: Option<String>,
    pub active_users: Option<f64>,
    pub total_users: Option<f64>,
    pub feature_usage: Option<f64>,
    pub usage_trend: Option<String>,
}

impl From<&UsageMetrics> for UsageMetricsDigest {
    fn from(metrics: &UsageMetrics) -> Self {
        Self {
            last_login_date: metrics.last_login_date.clone(),
            active_users: metrics.active_users,
            total_users: metrics.total_users,
            feature_usage: metrics.feature_usage_score,
            usage_trend: metrics.usage_trend.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRep {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AccountRep {
    pub fn from_owner(owner: Option<&AccountOwner>) -> Self {
        Self {
            name: owner.and_then(|o| o.name.clone()),
            email: owner.and_then(|o| o.email.clone()),
            phone: owner.and_then(|o| o.phone.clone()),
        }
    }
}
