//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! invoker / transport / config
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (fmt or JSON)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the test
//!   harness's choice
//! - `RUST_LOG` wins over the configured filter

pub mod logging;

pub use logging::init_logging;
