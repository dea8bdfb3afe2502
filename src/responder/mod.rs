//! Responders and canned responses.
//!
//! # Data Flow
//! ```text
//! MockRequest
//!     → Responder::respond (user closure or canned builder)
//!     → MockResponse { status, headers, RespBody }
//! ```
//!
//! # Design Decisions
//! - Responders are async; synchronous closures are adapted with `responder_fn`
//! - The responder future is `'static` so it can be moved onto its own task
//! - Canned responders hand out a fresh body cursor per call

use std::future::Future;

use futures_util::future::BoxFuture;
use hyper::body::Bytes;
use hyper::{Request, Response};

use crate::error::Result;

pub mod body;
pub mod builders;

pub use body::RespBody;
pub use builders::*;

/// Request type seen by responders.
pub type MockRequest = Request<Bytes>;

/// Response type produced by responders.
pub type MockResponse = Response<RespBody>;

/// Produces a response (or an error) for an intercepted request.
pub trait Responder: Send + Sync + 'static {
    fn respond(&self, request: MockRequest) -> BoxFuture<'static, Result<MockResponse>>;
}

impl<F, Fut> Responder for F
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MockResponse>> + Send + 'static,
{
    fn respond(&self, request: MockRequest) -> BoxFuture<'static, Result<MockResponse>> {
        Box::pin(self(request))
    }
}

/// Adapter for synchronous closures. See [`responder_fn`].
pub struct SyncResponder<F>(F);

impl<F> Responder for SyncResponder<F>
where
    F: Fn(MockRequest) -> Result<MockResponse> + Send + Sync + 'static,
{
    fn respond(&self, request: MockRequest) -> BoxFuture<'static, Result<MockResponse>> {
        Box::pin(std::future::ready((self.0)(request)))
    }
}

/// Wrap a synchronous closure as a responder.
///
/// The closure runs on a runtime worker; it should not block.
pub fn responder_fn<F>(f: F) -> SyncResponder<F>
where
    F: Fn(MockRequest) -> Result<MockResponse> + Send + Sync + 'static,
{
    SyncResponder(f)
}
