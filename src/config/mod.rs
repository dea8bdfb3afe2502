//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TransportConfig (validated, immutable)
//!     → shared via Arc by every clone of a MockTransport
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LoggingConfig, ThrottleConfig, TransportConfig};
pub use validation::{validate_config, ValidationError};
