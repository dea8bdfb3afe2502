//! Cancelable responder invocation.
//!
//! # Race
//! ```text
//! watcher task:  cancel signal ─┐
//!                stand-down ────┤ (exits quietly)
//!                               ▼
//!                        result conduit (capacity 1) ──▶ caller
//!                               ▲
//! executor task: responder ─────┘ (panic caught → ResponderPanic)
//! ```
//!
//! # Invariants
//! - The caller observes exactly one outcome
//! - Neither producer ever blocks on the conduit; the loser's write is dropped
//! - The watcher is released by stand-down once the outcome is read
//! - A responder that loses the race is not interrupted; it finishes in the
//!   background and its outcome is discarded

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};
use crate::responder::{MockRequest, MockResponse, Responder};

use super::signal::CancelExt;

/// Run `responder` against `request`, racing it against the request's
/// cancellation signal.
///
/// Requests without a signal are answered inline with no extra tasks.
pub async fn run_cancelable(
    responder: Arc<dyn Responder>,
    request: MockRequest,
) -> Result<MockResponse> {
    let Some(cancel) = request.cancel_signal().cloned() else {
        return guarded(responder, request).await;
    };

    let (result_tx, mut result_rx) = mpsc::channel::<Result<MockResponse>>(1);
    let (stand_down_tx, stand_down_rx) = oneshot::channel::<()>();

    let watcher_tx = result_tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.fired() => {
                tracing::debug!("Cancellation fired before responder returned");
                let _ = watcher_tx.try_send(Err(Error::Canceled));
            }
            _ = stand_down_rx => {}
        }
    });

    tokio::spawn(async move {
        let outcome = guarded(responder, request).await;
        if result_tx.try_send(outcome).is_err() {
            tracing::debug!("Responder finished after losing the race; outcome discarded");
        }
    });

    let outcome = result_rx.recv().await.unwrap_or(Err(Error::Abandoned));

    // The watcher may still be waiting on a cancellation that never comes.
    let _ = stand_down_tx.send(());

    outcome
}

/// Invoke the responder, converting a panic into `Error::ResponderPanic`.
async fn guarded(responder: Arc<dyn Responder>, request: MockRequest) -> Result<MockResponse> {
    let call = async move { responder.respond(request).await };
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(panic = %message, "Responder panicked");
            Err(Error::ResponderPanic(message))
        }
    }
}

macro_rules! render_as {
    ($payload:expr, $($ty:ty),+) => {
        $(
            if let Some(value) = $payload.downcast_ref::<$ty>() {
                return value.to_string();
            }
        )+
    };
}

/// Render a panic payload; `panic!` produces `&str` or `String`, while
/// `panic_any` can carry anything.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    render_as!(payload, &str, String);
    render_as!(payload, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char);
    if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        return err.to_string();
    }
    if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send>>() {
        return err.to_string();
    }
    "<non-string panic payload>".to_string()
}
