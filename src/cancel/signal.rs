//! One-shot, broadcastable cancellation signal.
//!
//! A `CancelHandle` fires at most once. Any number of `CancelSignal`
//! observers can check or await the transition; the payload is irrelevant,
//! only fired/not-fired matters.

use hyper::Request;
use tokio::sync::watch;

/// Producer side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    /// Create a handle that has not fired yet.
    pub fn new() -> Self {
        cancel_pair().0
    }

    /// Fire the signal. Repeated calls are no-ops.
    pub fn cancel(&self) {
        if !self.tx.send_replace(true) {
            tracing::trace!(observers = self.tx.receiver_count(), "Cancellation fired");
        }
    }

    /// Mint another observer of this signal.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Number of live observers of this signal.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    /// Whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal fires.
    ///
    /// If the handle is dropped without firing, this never resolves.
    pub async fn fired(&self) {
        let mut rx = self.rx.clone();
        let closed = rx.wait_for(|fired| *fired).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Attach and read cancellation signals on requests.
pub trait CancelExt {
    /// Builder-style attach.
    fn with_cancel(self, signal: CancelSignal) -> Self;

    fn set_cancel(&mut self, signal: CancelSignal);

    /// The request's cancellation signal, if it is cancelable.
    fn cancel_signal(&self) -> Option<&CancelSignal>;
}

impl<B> CancelExt for Request<B> {
    fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.set_cancel(signal);
        self
    }

    fn set_cancel(&mut self, signal: CancelSignal) {
        self.extensions_mut().insert(signal);
    }

    fn cancel_signal(&self) -> Option<&CancelSignal> {
        self.extensions().get::<CancelSignal>()
    }
}
