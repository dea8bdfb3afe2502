//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (throttle rate usable as a per-byte delay)
//! - Check the log filter directive parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TransportConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::TransportConfig;

/// Fastest rate that still yields a non-zero per-byte delay.
const MAX_BYTES_PER_SEC: u32 = 1_000_000_000;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("throttle.bytes_per_sec must be between 1 and {max}, got {got}")]
    ThrottleRate { got: u32, max: u32 },

    #[error("logging.filter is invalid: {0}")]
    LogFilter(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &TransportConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rate = config.throttle.bytes_per_sec;
    if rate == 0 || rate > MAX_BYTES_PER_SEC {
        errors.push(ValidationError::ThrottleRate {
            got: rate,
            max: MAX_BYTES_PER_SEC,
        });
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(ValidationError::LogFilter(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
