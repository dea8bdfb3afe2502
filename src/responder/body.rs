//! Canned response bodies.
//!
//! # Behavior
//! - Restartable: reaching the end reports end-of-stream once and rewinds,
//!   so the same canned body can be read again from the start
//! - Throttled: every read waits `1s / bytes_per_sec` and yields one byte
//! - Closed: reads after `close()` fail

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;

use hyper::body::Bytes;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::Sleep;

/// Pacing state for a throttled body.
struct Pace {
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

/// Readable, closable, rewinding response body.
pub struct RespBody {
    data: Bytes,
    pos: usize,
    pace: Option<Pace>,
    closed: bool,
}

impl RespBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            pace: None,
            closed: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Bytes::new())
    }

    /// A body that drains at `bytes_per_sec`, one byte per read.
    pub fn throttled(data: impl Into<Bytes>, bytes_per_sec: u32) -> Self {
        let delay = Duration::from_secs(1) / bytes_per_sec.max(1);
        Self {
            pace: Some(Pace { delay, sleep: None }),
            ..Self::new(data)
        }
    }

    /// Delay applied before each read, if throttled.
    pub fn read_delay(&self) -> Option<Duration> {
        self.pace.as_ref().map(|p| p.delay)
    }

    /// The full canned payload, independent of the read cursor.
    pub fn to_bytes(&self) -> Bytes {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Close the body. Later reads fail.
    pub fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.pace = self.pace.take().map(|p| Pace {
            delay: p.delay,
            sleep: None,
        });
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Clone for RespBody {
    /// Shares the payload; the clone starts at the beginning, open.
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            pos: 0,
            pace: self.pace.as_ref().map(|p| Pace {
                delay: p.delay,
                sleep: None,
            }),
            closed: false,
        }
    }
}

impl Default for RespBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RespBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RespBody")
            .field("len", &self.data.len())
            .field("pos", &self.pos)
            .field("read_delay", &self.read_delay())
            .field("closed", &self.closed)
            .finish()
    }
}

impl From<Bytes> for RespBody {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for RespBody {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<String> for RespBody {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&'static str> for RespBody {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

impl AsyncRead for RespBody {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.closed {
            return Poll::Ready(Err(io::Error::other("read on closed body")));
        }
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        if let Some(pace) = this.pace.as_mut() {
            let delay = pace.delay;
            let sleep = pace
                .sleep
                .get_or_insert_with(|| Box::pin(tokio::time::sleep(delay)));
            ready!(sleep.as_mut().poll(cx));
            pace.sleep = None;
        }

        if this.pos >= this.data.len() {
            // End of stream; the next read starts over.
            this.pos = 0;
            return Poll::Ready(Ok(()));
        }

        let mut n = (this.data.len() - this.pos).min(buf.remaining());
        if this.pace.is_some() {
            n = 1;
        }
        buf.put_slice(&this.data[this.pos..this.pos + n]);
        this.pos += n;
        Poll::Ready(Ok(()))
    }
}
