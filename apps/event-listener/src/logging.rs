//! Structured JSON logging setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global subscriber. `RUST_LOG` wins over the configured
/// fallback filter. Exits the process when the filter cannot be parsed,
/// since running blind is worse than not running.
pub fn init_logging(filter: &str) {
    let filter_layer = match EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
    {
        Ok(layer) => layer,
        Err(error) => {
            eprintln!("Failed to initialize logging filter: {error}");
            std::process::exit(1);
        }
    };

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
