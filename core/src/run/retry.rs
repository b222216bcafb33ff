//! Retry with exponential backoff for oracle calls.
//!
//! Only retryable transport failures (timeouts, connection errors, rate limits,
//! upstream 5xx) are retried. Invalid responses are returned immediately.

use crate::error::CoreResult;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_before_retry(&self, retry_number: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry_number.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the policy
/// runs out of attempts. Returns the final result and the attempts used.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut f: F) -> (CoreResult<T>, u32)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CoreResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(v) => return (Ok(v), attempt),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_before_retry(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "oracle call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return (Err(e), attempt),
        }
    }
}
