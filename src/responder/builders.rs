//! Canned response and responder builders.
//!
//! Responses carry a restartable body. Responders built from a canned
//! response replay it on every call with a fresh body cursor.

use std::time::Duration;

use futures_util::future::BoxFuture;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode, Version};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::responder::{MockRequest, MockResponse, RespBody, Responder};

/// Throttle rate used when none is configured.
pub const DEFAULT_BYTES_PER_SEC: u32 = 4096;

fn response_with_body(status: StatusCode, body: RespBody) -> MockResponse {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

/// Response with a string body.
pub fn string_response(status: StatusCode, body: impl Into<String>) -> MockResponse {
    response_with_body(status, RespBody::from(body.into()))
}

/// Response with a byte body.
pub fn bytes_response(status: StatusCode, body: impl Into<Bytes>) -> MockResponse {
    response_with_body(status, RespBody::new(body))
}

/// Response whose body is the JSON encoding of `body`.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Result<MockResponse> {
    let encoded = serde_json::to_vec(body)?;
    let mut response = bytes_response(status, encoded);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

/// Response whose body is the XML encoding of `body`.
pub fn xml_response<T: Serialize>(status: StatusCode, body: &T) -> Result<MockResponse> {
    let encoded = quick_xml::se::to_string(body).map_err(|e| Error::Xml(e.to_string()))?;
    let mut response = bytes_response(status, encoded);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
    Ok(response)
}

/// Response with a string body that drains at `bytes_per_sec`.
pub fn slow_string_response(
    status: StatusCode,
    body: impl Into<String>,
    bytes_per_sec: u32,
) -> MockResponse {
    response_with_body(status, RespBody::throttled(body.into(), bytes_per_sec))
}

/// Responder that replays a canned response, optionally after a delay.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: RespBody,
    delay: Option<Duration>,
}

impl CannedResponder {
    pub fn new(response: MockResponse) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
            delay: None,
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Materialize a fresh copy of the canned response.
    pub fn to_response(&self) -> MockResponse {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl Responder for CannedResponder {
    fn respond(&self, _request: MockRequest) -> BoxFuture<'static, Result<MockResponse>> {
        let response = self.to_response();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(response)
        })
    }
}

pub fn responder_from_response(response: MockResponse) -> CannedResponder {
    CannedResponder::new(response)
}

/// Like [`responder_from_response`], answering after `delay`.
pub fn responder_from_delay_response(delay: Duration, response: MockResponse) -> CannedResponder {
    CannedResponder::new(response).with_delay(delay)
}

pub fn string_responder(status: StatusCode, body: impl Into<String>) -> CannedResponder {
    responder_from_response(string_response(status, body))
}

/// String responder that sleeps first; useful to exercise cancellation.
pub fn string_responder_with_delay(
    delay: Duration,
    status: StatusCode,
    body: impl Into<String>,
) -> CannedResponder {
    responder_from_delay_response(delay, string_response(status, body))
}

pub fn bytes_responder(status: StatusCode, body: impl Into<Bytes>) -> CannedResponder {
    responder_from_response(bytes_response(status, body))
}

pub fn json_responder<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Result<CannedResponder> {
    json_response(status, body).map(responder_from_response)
}

pub fn xml_responder<T: Serialize>(status: StatusCode, body: &T) -> Result<CannedResponder> {
    xml_response(status, body).map(responder_from_response)
}

/// Responder whose body drains at `bytes_per_sec`.
pub fn slow_string_responder(
    status: StatusCode,
    body: impl Into<String>,
    bytes_per_sec: u32,
) -> CannedResponder {
    responder_from_response(slow_string_response(status, body, bytes_per_sec))
}
