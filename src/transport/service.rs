//! `tower::Service` adapter, so a `MockTransport` can sit wherever a client
//! stack expects a transport service.

use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::Service;

use crate::error::{Error, Result};
use crate::responder::{MockRequest, MockResponse};

use super::MockTransport;

impl Service<MockRequest> for MockTransport {
    type Response = MockResponse;
    type Error = Error;
    type Future = BoxFuture<'static, Result<MockResponse>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: MockRequest) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.round_trip(request).await })
    }
}
