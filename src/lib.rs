//! Mock HTTP transport for tests.
//!
//! Intercepts outbound requests and answers them with canned responses
//! instead of touching the network.
//!
//! # Architecture Overview
//!
//! ```text
//!     MockRequest (+ optional CancelSignal in extensions)
//!         │
//!         ▼
//!   ┌──────────────┐     ┌─────────────────────────────────────┐
//!   │  transport   │────▶│  cancel::run_cancelable             │
//!   │  registry    │     │   watcher ─┐                        │
//!   └──────────────┘     │            ├─▶ first outcome wins   │
//!                        │   executor ┘   (panics contained)   │
//!                        └──────────────────┬──────────────────┘
//!                                           ▼
//!                          MockResponse { status, headers, RespBody }
//!
//!   Cross-cutting: config (TOML), observability (tracing), error
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod observability;
pub mod recorder;
pub mod responder;
pub mod transport;

pub use cancel::{cancel_pair, run_cancelable, CancelExt, CancelHandle, CancelSignal};
pub use config::TransportConfig;
pub use error::{BoxError, Error, Result};
pub use recorder::CloseNotifyingRecorder;
pub use responder::{responder_fn, MockRequest, MockResponse, RespBody, Responder};
pub use transport::MockTransport;
