//! Multi-source account enrichment.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use tracing::{debug, info};

use churnwatch_salesforce::{Account, Case, Contact, Opportunity, SalesforceClient, UsageMetrics};

use crate::error::ApiResult;
use crate::types::{
    AccountRep, AccountSummary, ContactSummary, EnrichedPayload, EventSummary, InboundEvent,
    OpportunityDigest, RecentActivity, SupportTicketSummary, UsageMetricsDigest,
};

/// Aggregates one account's CRM records into an [`EnrichedPayload`].
pub struct EnrichmentService {
    client: Arc<SalesforceClient>,
    case_lookback_days: u32,
}

impl EnrichmentService {
    pub fn new(client: Arc<SalesforceClient>, case_lookback_days: u32) -> Self {
        Self {
            client,
            case_lookback_days,
        }
    }

    /// Fetches the account and its related records, then shapes the payload.
    ///
    /// The account fetch is mandatory and its failure aborts enrichment. The
    /// four related fetches run concurrently and each degrades to an
    /// empty/absent value inside the client, so an account that exists
    /// always enriches successfully.
    pub async fn enrich(
        &self,
        account_id: &str,
        event: &InboundEvent,
    ) -> ApiResult<EnrichedPayload> {
        debug!(target: "enrichment", account_id = %account_id, "Enriching account");
        let account = self.client.get_account(account_id).await?;

        let (contacts, cases, opportunities, usage_metrics) = tokio::join!(
            self.client.get_contacts(account_id),
            self.client.get_recent_cases(account_id, self.case_lookback_days),
            self.client.get_open_opportunities(account_id),
            self.client.get_usage_metrics(account_id),
        );

        let payload = assemble_payload(
            event,
            &account,
            &contacts,
            &cases,
            &opportunities,
            usage_metrics.as_ref(),
            Utc::now(),
        );
        info!(
            target: "enrichment",
            account_id = %account_id,
            contacts = payload.contacts.len(),
            cases = payload.recent_activity.support_tickets.total,
            opportunities = payload.recent_activity.opportunities.len(),
            has_usage_metrics = payload.recent_activity.usage_metrics.is_some(),
            "Account enriched"
        );
        Ok(payload)
    }
}

/// Pure payload assembly: the same records and clock always produce the same
/// payload.
fn assemble_payload(
    event: &InboundEvent,
    account: &Account,
    contacts: &[Contact],
    cases: &[Case],
    opportunities: &[Opportunity],
    usage_metrics: Option<&UsageMetrics>,
    now: DateTime<Utc>,
) -> EnrichedPayload {
    let tenure = tenure_months(account.contract_start_date.as_deref(), now.date_naive());
    EnrichedPayload {
        event: EventSummary {
            event_type: event.event_type().map(ToOwned::to_owned),
            timestamp: event
                .timestamp()
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            trigger: event.trigger().unwrap_or("Unknown").to_owned(),
            details: event.details().clone(),
        },
        account: AccountSummary::from_account(account, tenure),
        contacts: contacts.iter().map(ContactSummary::from).collect(),
        recent_activity: RecentActivity {
            support_tickets: SupportTicketSummary::from_cases(cases),
            opportunities: opportunities.iter().map(OpportunityDigest::from).collect(),
            usage_metrics: usage_metrics.map(UsageMetricsDigest::from),
        },
        account_rep: AccountRep::from_owner(account.owner.as_ref()),
    }
}

/// Whole months between contract start and `today` by calendar-field
/// subtraction. The day of month is ignored, so a contract started on the
/// 20th counts a full month on the following 1st; `None` when the start
/// date is missing or does not parse as a date.
fn tenure_months(start_date: Option<&str>, today: NaiveDate) -> Option<i32> {
    let start = NaiveDate::parse_from_str(start_date?, "%Y-%m-%d").ok()?;
    Some((today.year() - start.year()) * 12 + (today.month() as i32 - start.month() as i32))
}
