//! Retry logic.
//!
//! # Responsibilities
//! - Re-run a fallible async operation until it succeeds or the attempt budget runs out
//! - Space attempts with exponential backoff (`initial × 2^i`)
//! - Surface only the last attempt's error
//!
//! # Design Decisions
//! - Attempts are strictly sequential; attempt N+1 starts after attempt N resolves
//! - No jitter: delays are exact so test timings are reproducible
//! - Earlier errors are dropped, never aggregated into the returned error
//! - No bounds on the error type; log lines carry attempt numbers and delays only

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::delay::sleep;

/// Attempt budget and initial backoff for [`retry_with_backoff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of invocations (values below 1 behave as 1).
    pub max_attempts: u32,
    /// Wait after the first failure; doubles after every further failure.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Run `operation` under this policy.
    pub async fn retry<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        retry_with_backoff(operation, self.max_attempts, self.initial_delay).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
        )
    }
}

/// Invoke `operation` up to `max_attempts` times.
///
/// The first attempt fires immediately. After the failure of zero-based attempt
/// `i`, and only if another attempt remains, the task sleeps for
/// `initial_delay × 2^i`. The first `Ok` is returned as is; when every attempt
/// fails the error from the final attempt is returned.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::debug!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if attempt + 1 >= max_attempts {
                    tracing::warn!(attempts = max_attempts, "Retry budget exhausted");
                    return Err(error);
                }

                let delay = calculate_backoff(attempt, initial_delay);
                tracing::info!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after backoff"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
