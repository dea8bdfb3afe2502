//! Mock HTTP transport.
//!
//! # Data Flow
//! ```text
//! MockRequest
//!     → registry lookup (exact method + URL)
//!     → fallback "no responder" responder, if set
//!     → cancel::run_cancelable (race vs cancellation signal)
//!     → MockResponse | Error
//! ```
//!
//! # Design Decisions
//! - The registry belongs to a transport instance, never to the process, so
//!   parallel tests cannot interfere with each other
//! - Clones share one registry; hand a clone to the client under test and
//!   keep one to register responders
//! - Lookup is exact; anything smarter belongs in a responder

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use hyper::{Method, StatusCode};

use crate::cancel::run_cancelable;
use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::responder::{slow_string_responder, CannedResponder, MockRequest, MockResponse, Responder};

mod service;

/// Registry key: method plus the full request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: Method,
    url: String,
}

struct Inner {
    responders: DashMap<RouteKey, Arc<dyn Responder>>,
    no_responder: RwLock<Option<Arc<dyn Responder>>>,
    config: TransportConfig,
}

/// Test-double transport answering requests from registered responders.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                responders: DashMap::new(),
                no_responder: RwLock::new(None),
                config,
            }),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }

    /// Answer `method url` with `responder`, replacing any previous one.
    pub fn register_responder(
        &self,
        method: Method,
        url: impl Into<String>,
        responder: impl Responder,
    ) {
        let key = RouteKey {
            method,
            url: url.into(),
        };
        tracing::debug!(method = %key.method, url = %key.url, "Responder registered");
        self.inner.responders.insert(key, Arc::new(responder));
    }

    /// Responder used when nothing matches. Without one, unmatched
    /// requests fail with `Error::NoResponder`.
    pub fn register_no_responder(&self, responder: impl Responder) {
        let mut slot = self
            .inner
            .no_responder
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(responder));
    }

    /// Drop every registered responder, including the fallback.
    pub fn reset(&self) {
        self.inner.responders.clear();
        *self
            .inner
            .no_responder
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("Responders reset");
    }

    pub fn responder_count(&self) -> usize {
        self.inner.responders.len()
    }

    /// Slow string responder paced at the configured throttle rate.
    pub fn slow_string_responder(
        &self,
        status: StatusCode,
        body: impl Into<String>,
    ) -> CannedResponder {
        slow_string_responder(status, body, self.inner.config.throttle.bytes_per_sec)
    }

    fn lookup(&self, key: &RouteKey) -> Option<Arc<dyn Responder>> {
        if let Some(found) = self.inner.responders.get(key) {
            return Some(Arc::clone(found.value()));
        }
        self.inner
            .no_responder
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Answer `request` from the registry.
    pub async fn round_trip(&self, request: MockRequest) -> Result<MockResponse> {
        let key = RouteKey {
            method: request.method().clone(),
            url: request.uri().to_string(),
        };

        let Some(responder) = self.lookup(&key) else {
            tracing::warn!(method = %key.method, url = %key.url, "No responder found");
            return Err(Error::NoResponder {
                method: key.method,
                url: key.url,
            });
        };

        let outcome = run_cancelable(responder, request).await;
        match &outcome {
            Ok(response) => tracing::debug!(
                method = %key.method,
                url = %key.url,
                status = %response.status(),
                "Mock response"
            ),
            Err(e) => tracing::debug!(
                method = %key.method,
                url = %key.url,
                error = %e,
                "Mock request failed"
            ),
        }
        outcome
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("responders", &self.inner.responders.len())
            .field("config", &self.inner.config)
            .finish()
    }
}
