//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::responder::DEFAULT_BYTES_PER_SEC;

/// Root configuration for a mock transport.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    /// Pacing for throttled bodies.
    pub throttle: ThrottleConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Throttled body configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Transfer rate of slow bodies, in bytes per second.
    pub bytes_per_sec: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            bytes_per_sec: DEFAULT_BYTES_PER_SEC,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mock_transport=debug".to_string(),
            json: false,
        }
    }
}
