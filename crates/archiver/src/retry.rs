//! Bounded retry with exponential backoff.

use rand::Rng;
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;

const BASE_DELAY: Duration = Duration::from_millis(250);
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Run `op` up to `max_attempts` times, sleeping an exponentially growing,
/// jittered delay between attempts.
///
/// Only errors for which `is_retryable` returns true are retried; anything
/// else (and exhaustion) returns the last error. Cancellation is observed
/// between attempts, aborting the loop with the last error.
pub(crate) async fn retry<T, E, Fut>(
    cancel: &CancellationToken,
    max_attempts: usize,
    is_retryable: impl Fn(&E) -> bool,
    mut op: impl FnMut() -> Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    assert!(max_attempts > 0, "retry requires at least one attempt");
    let mut delay = BASE_DELAY;

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(err),
                    _ = tokio::time::sleep(jitter(delay)) => {}
                }
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("loop returns on the final attempt")
}

/// Scale the delay by a random factor in [0.5, 1.5).
fn jitter(delay: Duration) -> Duration {
    delay.mul_f64(rand::rng().random_range(0.5..1.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Failure(bool);

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let cancel = CancellationToken::new();
        let attempts = AtomicUsize::new(0);

        let result = retry(&cancel, 5, |e: &Failure| e.0, || async {
            if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Failure(true))
            } else {
                Ok(attempts.load(Ordering::SeqCst))
            }
        })
        .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let cancel = CancellationToken::new();
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = retry(&cancel, 3, |e: &Failure| e.0, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(Failure(true))
        })
        .await;

        assert_eq!(result, Err(Failure(true)));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_short_circuit() {
        let cancel = CancellationToken::new();
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = retry(&cancel, 10, |e: &Failure| e.0, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(Failure(false))
        })
        .await;

        assert_eq!(result, Err(Failure(false)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_between_attempts() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = retry(&cancel, 10, |e: &Failure| e.0, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(Failure(true))
        })
        .await;

        assert_eq!(result, Err(Failure(true)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
