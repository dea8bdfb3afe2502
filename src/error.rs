//! Error types for the mock transport.
//!
//! # Taxonomy
//! - `Canceled`: the request's cancellation signal fired before the responder finished
//! - `ResponderPanic`: the responder panicked; the panic is caught at the task boundary
//! - `Responder`: the responder returned its own error; passed through unchanged
//!
//! Everything else is raised by collaborators (builders, registry) before a
//! responder is ever invoked.

use hyper::Method;
use thiserror::Error;

/// Boxed error produced by user code inside a responder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the mock transport.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller fired the cancellation signal before the responder returned.
    #[error("request canceled")]
    Canceled,

    /// The responder panicked. Holds the rendered panic payload.
    #[error("panic in responder: got {0:?}")]
    ResponderPanic(String),

    /// The responder reported its own error.
    #[error(transparent)]
    Responder(BoxError),

    /// No responder is registered for the request and no fallback is set.
    #[error("no responder found for {method} {url}")]
    NoResponder { method: Method, url: String },

    /// A canned JSON body could not be encoded.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A canned XML body could not be encoded.
    #[error("xml encoding failed: {0}")]
    Xml(String),

    /// Both racing tasks ended without delivering an outcome.
    #[error("responder task ended without an outcome")]
    Abandoned,
}

impl Error {
    /// Build a responder-side error from any message.
    pub fn responder(msg: impl Into<String>) -> Self {
        Error::Responder(msg.into().into())
    }

    /// Whether this error is the cancellation outcome.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
