//! Caller retry loop timing under a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hfrelay::retry::{RetryLoop, RetryPolicy};
use hfrelay::types::{CandidateFailure, Capability, Exhaustion, SequenceResult, UnavailableReason};
use tokio::time::Instant;

fn still_loading() -> SequenceResult {
    SequenceResult::Exhausted(Exhaustion {
        capability: Capability::Story,
        attempted: vec!["a".into(), "b".into()],
        failures: vec![
            CandidateFailure::Unavailable {
                model: "a".into(),
                reason: UnavailableReason::StillLoading,
                status: Some(503),
                detail: "loading".into(),
            },
            CandidateFailure::Rejected {
                model: "b".into(),
                status: 400,
                body: "bad".into(),
            },
        ],
    })
}

#[tokio::test(start_paused = true)]
async fn always_transient_runs_max_plus_one_spaced_passes() {
    let policy = RetryPolicy::new()
        .with_max_extra_attempts(3)
        .with_delay(Duration::from_secs(10));
    let starts = Arc::new(Mutex::new(Vec::new()));

    let starts_clone = starts.clone();
    let result = RetryLoop::new(policy)
        .run(move || {
            let starts = starts_clone.clone();
            async move {
                starts.lock().unwrap().push(Instant::now());
                still_loading()
            }
        })
        .await;

    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 4);
    for pair in starts.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_secs(10));
    }

    let SequenceResult::Exhausted(ex) = result else {
        panic!("expected terminal exhaustion");
    };
    assert_eq!(ex.attempted, vec!["a", "b"]);
    assert!(ex.is_transient());
}

#[tokio::test(start_paused = true)]
async fn custom_ceiling_and_delay() {
    let policy = RetryPolicy::new()
        .with_max_extra_attempts(1)
        .with_delay(Duration::from_millis(250));
    let started = Instant::now();
    let passes = Arc::new(Mutex::new(0u32));

    let passes_clone = passes.clone();
    RetryLoop::new(policy)
        .run(move || {
            let passes = passes_clone.clone();
            async move {
                *passes.lock().unwrap() += 1;
                still_loading()
            }
        })
        .await;

    assert_eq!(*passes.lock().unwrap(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(250));
}
