//! Shared fixtures for webhook pipeline tests: a mocked Salesforce org, a
//! mocked prediction service, and helpers for driving the router.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use serde_json::{json, Map, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, ResponseTemplate};

use churnwatch_events::types::{
    AccountRep, AccountSummary, EnrichedPayload, EventSummary, RecentActivity,
    SupportTicketSummary,
};
use churnwatch_events::{EnrichmentService, EventsState, ForwardingService, FORWARD_TIMEOUT};
use churnwatch_salesforce::{SalesforceClient, SalesforceCredentials};

pub const ACCOUNT_ID: &str = "0015g00000AbCdE";
pub const QUERY_PATH: &str = "/services/data/v59.0/query";
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Matches requests whose `q` query parameter contains the given SOQL
/// fragment (after percent-decoding).
pub struct SoqlContains(pub &'static str);

impl Match for SoqlContains {
    fn matches(&self, request: &wiremock::Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(key, value)| key == "q" && value.contains(self.0))
    }
}

pub fn credentials(login_url: &str) -> SalesforceCredentials {
    SalesforceCredentials {
        login_url: login_url.to_string(),
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
        username: "integration@example.com".to_string(),
        password: "password".to_string(),
        security_token: "token".to_string(),
    }
}

/// Builds the full pipeline state against the two mock servers. A custom
/// forward client (with the budget it was built with) lets tests shrink
/// the delivery timeout.
pub fn build_state(
    salesforce: &MockServer,
    prediction: &MockServer,
    webhook_secret: Option<&str>,
    forward_client: Option<(reqwest::Client, Duration)>,
) -> EventsState {
    let client =
        SalesforceClient::with_http_client(credentials(&salesforce.uri()), reqwest::Client::new());
    let enrichment = Arc::new(EnrichmentService::new(Arc::new(client), 30));
    let (forward_http, forward_timeout) =
        forward_client.unwrap_or_else(|| (reqwest::Client::new(), FORWARD_TIMEOUT));
    let forwarder =
        ForwardingService::with_http_client(&prediction.uri(), forward_http, forward_timeout);
    EventsState::new(enrichment, Arc::new(forwarder), webhook_secret.map(ToOwned::to_owned))
}

pub async fn post_webhook(app: Router, body: &Value, signature: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri("/webhooks/salesforce")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        request = request.header("x-salesforce-signature", signature);
    }
    let request = request
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// JSON bodies the prediction mock received, in arrival order.
pub async fn forwarded_payloads(prediction: &MockServer) -> Vec<Value> {
    prediction
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

pub async fn assert_no_requests(server: &MockServer) {
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Salesforce mock data ────────────────────────────────────────────────

fn token_body(instance_url: &str) -> Value {
    json!({
        "access_token": "00D5g000001aBcD!AQEAQFakeSessionToken",
        "instance_url": instance_url,
        "token_type": "Bearer"
    })
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&server.uri())))
        .mount(server)
        .await;
}

pub async fn mount_query(server: &MockServer, fragment: &'static str, body: Value) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(SoqlContains(fragment))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_query_failure(server: &MockServer, fragment: &'static str, status: u16) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(SoqlContains(fragment))
        .respond_with(ResponseTemplate::new(status).set_body_string("simulated fault"))
        .mount(server)
        .await;
}

pub fn empty_records() -> Value {
    json!({"totalSize": 0, "done": true, "records": []})
}

pub fn account_records() -> Value {
    json!({
        "totalSize": 1,
        "done": true,
        "records": [{
            "attributes": {"type": "Account"},
            "Id": ACCOUNT_ID,
            "Name": "Globex Corporation",
            "Industry": "Manufacturing",
            "AnnualRevenue": 2_500_000.0,
            "Annual_Contract_Value__c": 120_000.0,
            "Contract_Start_Date__c": "2022-06-01",
            "Contract_End_Date__c": "2026-06-01",
            "Account_Status__c": "Active",
            "Type": "Customer - Direct",
            "OwnerId": "0055g000004XyZa",
            "Owner": {
                "attributes": {"type": "User"},
                "Name": "Dana Reyes",
                "Email": "dana.reyes@example.com",
                "Phone": "+1-555-0100"
            }
        }]
    })
}

pub fn contact_records() -> Value {
    json!({
        "totalSize": 2,
        "done": true,
        "records": [
            {
                "attributes": {"type": "Contact"},
                "Id": "0035g00000C1",
                "Name": "Sam Olsen",
                "Email": "sam.olsen@example.com",
                "Phone": "+1-555-0110",
                "Title": "VP Operations",
                "Primary_Contact__c": true
            },
            {
                "attributes": {"type": "Contact"},
                "Id": "0035g00000C2",
                "Name": "Riley Chen",
                "Email": "riley.chen@example.com",
                "Title": "IT Admin",
                "Primary_Contact__c": false
            }
        ]
    })
}

pub fn case_records() -> Value {
    json!({
        "totalSize": 2,
        "done": true,
        "records": [
            {
                "attributes": {"type": "Case"},
                "Id": "5005g00000Kx2",
                "CaseNumber": "00001042",
                "Subject": "Export fails for large datasets",
                "Status": "New",
                "Priority": "High",
                "CreatedDate": "2026-08-20T11:04:00.000+0000",
                "IsClosed": false,
                "IsEscalated": true
            },
            {
                "attributes": {"type": "Case"},
                "Id": "5005g00000Kx1",
                "CaseNumber": "00001037",
                "Subject": "Login loop after SSO change",
                "Status": "Closed",
                "Priority": "Medium",
                "CreatedDate": "2026-08-12T09:30:00.000+0000",
                "IsClosed": true,
                "IsEscalated": false
            }
        ]
    })
}

pub fn opportunity_records() -> Value {
    json!({
        "totalSize": 1,
        "done": true,
        "records": [{
            "attributes": {"type": "Opportunity"},
            "Id": "0065g00000Opp1",
            "Name": "Globex Renewal FY27",
            "StageName": "Negotiation",
            "Amount": 120_000.0,
            "CloseDate": "2026-10-01",
            "Probability": 60.0,
            "Type": "Renewal"
        }]
    })
}

pub fn usage_metric_records() -> Value {
    json!({
        "totalSize": 1,
        "done": true,
        "records": [{
            "attributes": {"type": "Usage_Metrics__c"},
            "Id": "a015g00000Um1",
            "Last_Login_Date__c": "2026-08-18T07:12:00.000+0000",
            "Active_Users__c": 41.0,
            "Total_Users__c": 120.0,
            "Feature_Usage_Score__c": 72.5,
            "Usage_Trend__c": "Declining"
        }]
    })
}

/// Mounts a healthy org: login plus all five enrichment queries.
pub async fn mount_standard_enrichment(server: &MockServer) {
    mount_token(server).await;
    mount_query(server, "FROM Account", account_records()).await;
    mount_query(server, "FROM Contact", contact_records()).await;
    mount_query(server, "FROM Case", case_records()).await;
    mount_query(server, "FROM Opportunity", opportunity_records()).await;
    mount_query(server, "FROM Usage_Metrics__c", usage_metric_records()).await;
}

/// A minimal already-enriched payload for exercising the forwarder alone.
pub fn sample_payload() -> EnrichedPayload {
    EnrichedPayload {
        event: EventSummary {
            event_type: Some("account_updated".to_string()),
            timestamp: "2026-08-01T00:00:00.000Z".to_string(),
            trigger: "Unknown".to_string(),
            details: Map::new(),
        },
        account: AccountSummary {
            id: ACCOUNT_ID.to_string(),
            name: Some("Globex Corporation".to_string()),
            industry: None,
            annual_revenue: None,
            contract_value: None,
            contract_start_date: None,
            contract_end_date: None,
            tenure_months: Some(12),
            status: None,
            account_type: None,
        },
        contacts: Vec::new(),
        recent_activity: RecentActivity {
            support_tickets: SupportTicketSummary::from_cases(&[]),
            opportunities: Vec::new(),
            usage_metrics: None,
        },
        account_rep: AccountRep {
            name: None,
            email: None,
            phone: None,
        },
    }
}
