//! Response recorder with a close notification.
//!
//! Stands in for the server side of a connection: a handler under test
//! writes its status, headers and body into the recorder, and the test can
//! simulate the client hanging up with `close()`.

use std::io;

use hyper::body::Bytes;
use hyper::{HeaderMap, Response, StatusCode};

use crate::cancel::{CancelHandle, CancelSignal};

/// Captures a response and exposes a one-shot "closed" notification.
#[derive(Debug)]
pub struct CloseNotifyingRecorder {
    status: StatusCode,
    headers: HeaderMap,
    /// Headers as they stood when the status was written.
    sent_headers: Option<HeaderMap>,
    body: Vec<u8>,
    wrote_header: bool,
    closed: CancelHandle,
}

impl CloseNotifyingRecorder {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            sent_headers: None,
            body: Vec::new(),
            wrote_header: false,
            closed: CancelHandle::new(),
        }
    }

    /// Record the status code and freeze the headers. Only the first call
    /// takes effect.
    pub fn write_header(&mut self, status: StatusCode) {
        if self.wrote_header {
            tracing::trace!(ignored = %status, kept = %self.status, "Duplicate write_header");
            return;
        }
        self.status = status;
        self.sent_headers = Some(self.headers.clone());
        self.wrote_header = true;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers that were sent, or the pending headers if nothing has been
    /// written yet.
    pub fn headers(&self) -> &HeaderMap {
        self.sent_headers.as_ref().unwrap_or(&self.headers)
    }

    /// Pending headers. Edits made after `write_header` or the first body
    /// write are not part of the recorded response.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Simulate the client closing the connection. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_fired()
    }

    /// Observer that fires once `close()` is called.
    pub fn close_notify(&self) -> CancelSignal {
        self.closed.signal()
    }

    /// The recorded response.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.sent_headers.unwrap_or(self.headers);
        response
    }
}

impl Default for CloseNotifyingRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for CloseNotifyingRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_header {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
