//! Cancellation subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → cancel_pair() → CancelHandle (kept) + CancelSignal (attached to request)
//!     → transport::round_trip / run_cancelable
//!     → invoker.rs races responder vs signal
//!     → first outcome returned to caller
//! ```
//!
//! # Design Decisions
//! - Signal is a fired/not-fired flag, not a message channel
//! - Cancellation is always caller-driven; the invoker never fires it
//! - Responders are not interrupted when they lose the race

pub mod invoker;
pub mod signal;

pub use invoker::run_cancelable;
pub use signal::{cancel_pair, CancelExt, CancelHandle, CancelSignal};
