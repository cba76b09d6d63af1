//! Bounded retry with exponential backoff.
//!
//! Client errors are final: a `4xx` status other than `429` is returned
//! immediately. Everything else (network failures, `5xx`, `429`, errors
//! without a status) is retried until the attempt budget is spent.
//!
//! ```text
//!   attempt 0 ──fail──▶ sleep(base) ──▶ attempt 1 ──fail──▶ sleep(base*2) ──▶ ...
//!       │                                    │
//!       └── 4xx (not 429) ──▶ Err            └── last attempt ──▶ Err (unchanged)
//! ```

use crate::domain::ApiError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Default attempt budget.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Suspends the current task between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Attempt budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero behaves as one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for every further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Number of attempts actually made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_retries == 0 {
            1
        } else {
            self.max_retries
        }
    }

    /// True when `error` is worth another attempt.
    #[must_use]
    pub fn should_retry(error: &ApiError) -> bool {
        !matches!(error.status, Some(status) if (400..500).contains(&status) && status != 429)
    }
}

/// Delay awaited after failed attempt `attempt` (zero-based).
///
/// ```
/// use std::time::Duration;
/// use storefront::api::backoff_delay;
///
/// let base = Duration::from_millis(100);
/// assert_eq!(backoff_delay(0, base), Duration::from_millis(100));
/// assert_eq!(backoff_delay(2, base), Duration::from_millis(400));
/// assert_eq!(backoff_delay(64, base), Duration::MAX);
/// ```
#[must_use]
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }
    2_u32
        .checked_pow(attempt)
        .and_then(|multiplier| base.checked_mul(multiplier))
        .unwrap_or(Duration::MAX)
}

/// Runs `fetch` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// Attempts are strictly sequential and the last error is returned
/// unchanged.
///
/// # Errors
///
/// Returns the first non-retryable error, or the error of the final attempt.
pub async fn retry_with_backoff<T, F, Fut>(
    mut fetch: F,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(error) if !RetryPolicy::should_retry(&error) => return Err(error),
            Err(error) if attempt + 1 >= attempts => {
                tracing::debug!(attempts, code = %error.code, "retry budget exhausted");
                return Err(error);
            }
            Err(error) => {
                let delay = backoff_delay(attempt, policy.base_delay);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    status = ?error.status,
                    code = %error.code,
                    "request failed, retrying"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::RecordingSleeper;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn status_error(status: u16) -> ApiError {
        ApiError::new("failed", ErrorCode::Native(format!("HTTP_{status}"))).with_status(status)
    }

    async fn run_failing(status: Option<u16>, policy: RetryPolicy) -> (u32, Vec<Duration>) {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let sleeper = RecordingSleeper::default();
        let result: Result<(), ApiError> = retry_with_backoff(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(status.map_or_else(
                    || ApiError::new("offline", ErrorCode::Network),
                    status_error,
                ))
            },
            &policy,
            &sleeper,
        )
        .await;
        assert!(result.is_err());
        (counter.load(Ordering::SeqCst), sleeper.recorded())
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let (calls, delays) = run_failing(Some(404), policy).await;
        assert_eq!(calls, 1);
        assert!(delays.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_retried_with_doubling_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let (calls, delays) = run_failing(Some(500), policy).await;
        assert_eq!(calls, 3);
        assert_eq!(delays, vec![Duration::from_millis(100), Duration::from_millis(200)]);
    }

    #[tokio::test]
    async fn rate_limit_is_retried() {
        let policy = RetryPolicy::new(2, Duration::from_millis(10));
        let (calls, _) = run_failing(Some(429), policy).await;
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn network_error_is_retried() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let (calls, _) = run_failing(None, policy).await;
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn zero_budget_still_attempts_once() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        let (calls, delays) = run_failing(Some(500), policy).await;
        assert_eq!(calls, 1);
        assert!(delays.is_empty());
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let sleeper = RecordingSleeper::default();
        let result = retry_with_backoff(
            move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(status_error(503))
                } else {
                    Ok("catalog")
                }
            },
            &RetryPolicy::new(3, Duration::from_millis(5)),
            &sleeper,
        )
        .await;
        assert_eq!(result.ok(), Some("catalog"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn last_error_is_returned_unchanged() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), ApiError> = retry_with_backoff(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::new(format!("attempt {n}"), ErrorCode::Unknown).with_status(502))
            },
            &RetryPolicy::new(3, Duration::ZERO),
            &RecordingSleeper::default(),
        )
        .await;
        assert_eq!(result.err().map(|e| e.message), Some("attempt 2".to_string()));
    }
}
