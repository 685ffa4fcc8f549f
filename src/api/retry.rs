//! Opt-in retry wrapper for facade operations.
//!
//! Bounded attempts with a constant inter-attempt delay (deliberately not
//! exponential), an optional per-attempt timeout, and an optional
//! cancellation token. The terminal failure propagates untouched;
//! intermediate failures are logged at warning level.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::error::ApiError;

/// Default inter-attempt delay in milliseconds.
/// 3 seconds gives a flaky endpoint time to recover without stalling callers.
const DEFAULT_BACKOFF_MS: u64 = 3000;

/// Per-call retry configuration.
///
/// The defaults match a plain single attempt: no retries, no timeout, no
/// cancellation. `attempts` below 1 is treated as 1.
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Constant delay between failed attempts.
    pub backoff: Duration,
    /// Per-attempt timeout; `None` (or zero) disables the race.
    pub timeout: Option<Duration>,
    /// Aborts the in-flight attempt and skips remaining retries when fired.
    pub cancel: Option<CancellationToken>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            timeout: None,
            cancel: None,
        }
    }
}

/// Run `operation` up to `options.attempts` times.
///
/// Returns the first success; after a non-final failure, waits
/// `options.backoff` before the next attempt. The final attempt's failure
/// is returned unchanged so callers can still branch on it.
pub(crate) async fn with_retry<T, F, Fut>(
    options: &RetryOptions,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let attempts = options.attempts.max(1);
    let mut attempt = 1;
    loop {
        match run_attempt(options, operation()).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= attempts || matches!(err, ApiError::Cancelled) {
                    return Err(err);
                }
                warn!(
                    attempt,
                    attempts,
                    error = %err,
                    "request attempt failed, retrying in {}ms",
                    options.backoff.as_millis()
                );
                if !wait_backoff(options).await {
                    return Err(ApiError::Cancelled);
                }
                attempt += 1;
            }
        }
    }
}

/// Run one attempt, racing it against the timeout and cancellation token.
async fn run_attempt<T, Fut>(options: &RetryOptions, attempt: Fut) -> Result<T, ApiError>
where
    Fut: Future<Output = Result<T, ApiError>>,
{
    let bounded = async {
        match options.timeout {
            Some(limit) if !limit.is_zero() => match tokio::time::timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout(limit)),
            },
            _ => attempt.await,
        }
    };
    match &options.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = bounded => result,
            }
        }
        None => bounded.await,
    }
}

/// Sleep for the backoff interval; returns false if cancelled mid-wait.
async fn wait_backoff(options: &RetryOptions) -> bool {
    match &options.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(options.backoff) => true,
            }
        }
        None => {
            tokio::time::sleep(options.backoff).await;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;

    fn failure() -> ApiError {
        ApiError::Validation("transient".into())
    }

    #[tokio::test(start_paused = true)]
    async fn success_returns_immediately() {
        let options = RetryOptions::default();
        let result = with_retry(&options, || async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_twice_then_succeeds_with_constant_backoff() {
        let options = RetryOptions {
            attempts: 3,
            backoff: Duration::from_millis(100),
            ..Default::default()
        };
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();

        let result = with_retry(&options, move || {
            let calls = counter.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(failure())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two backoff waits of 100ms each.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_failure_propagates_without_backoff() {
        let options = RetryOptions::default();
        let start = Instant::now();
        let result = with_retry(&options, || async { Err::<(), _>(failure()) }).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_is_the_last_attempt_error() {
        let options = RetryOptions {
            attempts: 2,
            backoff: Duration::from_millis(10),
            ..Default::default()
        };
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(&options, move || {
            let calls = counter.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(failure())
            }
        })
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_when_attempt_never_settles() {
        let options = RetryOptions {
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let start = Instant::now();
        let result = with_retry(&options, || std::future::pending::<Result<(), ApiError>>()).await;
        assert!(matches!(result, Err(ApiError::Timeout(_))));
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_means_disabled() {
        let options = RetryOptions {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        let result = with_retry(&options, || async { Ok::<_, ApiError>("done") }).await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_attempts_count_like_any_failure() {
        let options = RetryOptions {
            attempts: 2,
            backoff: Duration::from_millis(10),
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = with_retry(&options, move || {
            let calls = counter.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 1 {
                    // First attempt hangs until the timeout fires.
                    std::future::pending::<()>().await;
                }
                Ok::<_, ApiError>(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pre_cancelled_token_aborts_before_the_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let options = RetryOptions {
            attempts: 3,
            cancel: Some(token),
            ..Default::default()
        };
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(&options, move || {
            let calls = counter.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(failure())
            }
        })
        .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_skips_remaining_attempts() {
        let token = CancellationToken::new();
        let options = RetryOptions {
            attempts: 5,
            backoff: Duration::from_secs(60),
            cancel: Some(token.clone()),
            ..Default::default()
        };
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let handle = tokio::spawn(async move {
            with_retry(&options, move || {
                let calls = counter.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(failure())
                }
            })
            .await
        });

        // Let the first attempt fail and enter the backoff wait.
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
