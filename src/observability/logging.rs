//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for a test run
//! - Configure log level from config or environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format when configured, pretty format otherwise
//! - Safe to call from many tests; only the first call installs

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install a global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_test_writer())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(filter = %config.filter, json = config.json, "Logging initialized");
            true
        }
        Err(_) => false,
    }
}
