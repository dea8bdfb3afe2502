//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Bytes;
use hyper::{Request, StatusCode};
use mock_transport::config::LoggingConfig;
use mock_transport::observability::init_logging;
use mock_transport::responder::string_response;
use mock_transport::{MockRequest, Responder};
use tokio::io::AsyncReadExt;

/// Install test logging once per binary.
pub fn init() {
    init_logging(&LoggingConfig::default());
}

pub fn get(url: &str) -> MockRequest {
    Request::get(url).body(Bytes::new()).unwrap()
}

/// Responder that sleeps for `delay`, answers 200 "ok", and flips
/// `finished` once done.
#[allow(dead_code)]
pub fn sleepy_responder(delay: Duration, finished: Arc<AtomicBool>) -> Arc<dyn Responder> {
    Arc::new(move |_req: MockRequest| {
        let finished = finished.clone();
        async move {
            tokio::time::sleep(delay).await;
            finished.store(true, Ordering::SeqCst);
            Ok::<_, mock_transport::Error>(string_response(StatusCode::OK, "ok"))
        }
    })
}

/// Drain a response body to a string.
#[allow(dead_code)]
pub async fn body_text(response: mock_transport::MockResponse) -> String {
    let mut body = response.into_body();
    let mut out = String::new();
    body.read_to_string(&mut out).await.unwrap();
    out
}
