//! Cancellation race tests for the cancelable invoker.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hyper::StatusCode;
use mock_transport::responder::{string_response, string_responder, string_responder_with_delay};
use mock_transport::{
    cancel_pair, responder_fn, run_cancelable, CancelExt, Error, MockRequest, Responder,
};
use rand::Rng;
use tokio::task::{self, Id};
use tokio::time::Instant;

mod common;

#[tokio::test]
async fn test_no_signal_passes_response_through() {
    common::init();
    let responder: Arc<dyn Responder> = Arc::new(string_responder(StatusCode::OK, "pong"));

    let response = run_cancelable(responder, common::get("http://api.test/ping"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_text(response).await, "pong");
}

#[tokio::test]
async fn test_no_signal_passes_error_through() {
    let responder: Arc<dyn Responder> =
        Arc::new(responder_fn(|_req| Err(Error::responder("upstream exploded"))));

    let err = run_cancelable(responder, common::get("http://api.test/"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Responder(_)));
    assert_eq!(err.to_string(), "upstream exploded");
}

/// Responder that records which task it ran on.
fn task_recorder() -> (Arc<dyn Responder>, Arc<Mutex<Option<Id>>>) {
    let seen = Arc::new(Mutex::new(None));
    let responder = responder_fn({
        let seen = seen.clone();
        move |_req| {
            *seen.lock().unwrap() = task::try_id();
            Ok(string_response(StatusCode::OK, "ok"))
        }
    });
    (Arc::new(responder), seen)
}

#[tokio::test]
async fn test_no_signal_runs_on_caller_task() {
    // Run inside a spawned task so the caller has a task id.
    tokio::spawn(async {
        let caller = task::try_id();
        assert!(caller.is_some());

        let (responder, seen) = task_recorder();
        run_cancelable(responder, common::get("http://api.test/"))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), caller);

        let (responder, seen) = task_recorder();
        let (_handle, signal) = cancel_pair();
        run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
            .await
            .unwrap();
        let executor = *seen.lock().unwrap();
        assert!(executor.is_some());
        assert_ne!(executor, caller);
    })
    .await
    .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_wins_against_slow_responder() {
    common::init();
    let (handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> = Arc::new(string_responder_with_delay(
        Duration::from_millis(500),
        StatusCode::OK,
        "ok",
    ));

    handle.cancel();
    let start = Instant::now();
    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();

    assert!(err.is_canceled());
    assert_eq!(err.to_string(), "request canceled");
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_mid_flight() {
    let (handle, signal) = cancel_pair();
    let finished = Arc::new(AtomicBool::new(false));
    let responder = common::sleepy_responder(Duration::from_secs(5), finished.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let start = Instant::now();
    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();

    assert!(err.is_canceled());
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(5));
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_losing_responder_runs_to_completion() {
    let (handle, signal) = cancel_pair();
    let finished = Arc::new(AtomicBool::new(false));
    let responder = common::sleepy_responder(Duration::from_secs(1), finished.clone());

    handle.cancel();
    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();
    assert!(err.is_canceled());
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(finished.load(Ordering::SeqCst), "responder should not be interrupted");
}

#[tokio::test]
async fn test_responder_wins_when_never_canceled() {
    let (_handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> = Arc::new(string_responder(StatusCode::OK, "pong"));

    let response = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_text(response).await, "pong");
}

#[tokio::test]
async fn test_responder_error_passes_through_race() {
    let (_handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> =
        Arc::new(responder_fn(|_req| Err(Error::responder("bad gateway upstream"))));

    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Responder(_)));
    assert_eq!(err.to_string(), "bad gateway upstream");
}

#[tokio::test]
async fn test_panic_is_contained() {
    common::init();
    let (_handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> = Arc::new(responder_fn(|_req| panic!("boom")));

    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("panic in responder"), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[tokio::test]
async fn test_panic_after_await_is_contained() {
    let (_handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> = Arc::new(|_req: MockRequest| async move {
        tokio::task::yield_now().await;
        if true {
            panic!("late {}", "boom");
        }
        Ok::<_, Error>(string_response(StatusCode::OK, "unreachable"))
    });

    let err = run_cancelable(responder, common::get("http://api.test/").with_cancel(signal))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResponderPanic(ref m) if m == "late boom"));
}

#[tokio::test(start_paused = true)]
async fn test_single_delivery_under_random_races() {
    let completed = Arc::new(AtomicUsize::new(0));
    let mut canceled = 0;
    let mut answered = 0;

    for _ in 0..1000 {
        let (responder_delay, cancel_delay) = {
            let mut rng = rand::thread_rng();
            (
                Duration::from_micros(rng.gen_range(0..400)),
                Duration::from_micros(rng.gen_range(0..400)),
            )
        };

        let counter = completed.clone();
        let responder: Arc<dyn Responder> = Arc::new(move |_req: MockRequest| {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(responder_delay).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(string_response(StatusCode::OK, "ok"))
            }
        });

        let (handle, signal) = cancel_pair();
        tokio::spawn(async move {
            tokio::time::sleep(cancel_delay).await;
            handle.cancel();
        });

        match run_cancelable(responder, common::get("http://api.test/").with_cancel(signal)).await {
            Ok(response) => {
                assert_eq!(response.status(), StatusCode::OK);
                answered += 1;
            }
            Err(Error::Canceled) => canceled += 1,
            Err(other) => panic!("unexpected outcome: {other}"),
        }
    }

    assert_eq!(answered + canceled, 1000);

    // Every responder finishes, whichever side won.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(completed.load(Ordering::SeqCst), 1000);
}

#[tokio::test(start_paused = true)]
async fn test_blocks_without_outcome() {
    let (_handle, signal) = cancel_pair();
    let responder: Arc<dyn Responder> = Arc::new(|_req: MockRequest| async move {
        std::future::pending::<()>().await;
        Ok::<_, Error>(string_response(StatusCode::OK, "never"))
    });

    let waited = tokio::time::timeout(
        Duration::from_secs(60),
        run_cancelable(responder, common::get("http://api.test/").with_cancel(signal)),
    )
    .await;

    assert!(waited.is_err(), "no outcome should be produced");
}
