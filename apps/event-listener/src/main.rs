//! Salesforce event listener: receives CRM webhooks, enriches the account
//! behind each event, and forwards the result to the churn prediction
//! service.

mod config;
mod health;
mod logging;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use churnwatch_events::{events_router, EnrichmentService, EventsState, ForwardingService};
use churnwatch_salesforce::SalesforceClient;

use crate::config::Config;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        prediction_url = %config.prediction_url,
        signature_verification = config.webhook_secret.is_some(),
        case_lookback_days = config.case_lookback_days,
        "Starting event listener"
    );

    let client = match SalesforceClient::new(
        config.salesforce.credentials(),
        Duration::from_secs(config.salesforce.timeout_secs),
    ) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "Failed to build Salesforce client");
            std::process::exit(1);
        }
    };
    let enrichment = Arc::new(EnrichmentService::new(
        Arc::new(client),
        config.case_lookback_days,
    ));
    let forwarder = match ForwardingService::new(&config.prediction_url) {
        Ok(forwarder) => forwarder,
        Err(err) => {
            error!(error = %err, "Failed to build forwarding service");
            std::process::exit(1);
        }
    };
    let state = EventsState::new(enrichment, Arc::new(forwarder), config.webhook_secret.clone());

    let app = Router::new()
        .route("/health", get(health::health_handler))
        .merge(events_router(state))
        .layer(axum::middleware::from_fn(middleware::log_requests));

    let addr = match config.bind_addr().parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, addr = %config.bind_addr(), "Invalid bind address");
            std::process::exit(1);
        }
    };
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!(%addr, "Event listener ready; waiting for Salesforce webhooks");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
    info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
