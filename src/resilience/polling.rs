//! Waiting for eventually-consistent state.
//!
//! Polling is bounded by wall-clock time, not by a number of checks: the point is
//! to wait for work happening in another service (an event consumer creating a
//! payment) whose completion time is unknown.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::PollConfig;
use crate::resilience::delay::sleep;

/// Why a poll gave up.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The condition never held before the deadline.
    #[error("Condition not met within {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
        /// Number of predicate checks performed.
        checks: u32,
    },

    /// The predicate itself failed; it is not retried.
    #[error("{0}")]
    Predicate(E),
}

impl<E> PollError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }

    /// The predicate's own error, if that is what ended the poll.
    pub fn into_predicate_error(self) -> Option<E> {
        match self {
            PollError::Predicate(e) => Some(e),
            PollError::Timeout { .. } => None,
        }
    }
}

/// Timeout and check interval for [`poll_until`] / [`poll_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub async fn until<F, Fut, E>(&self, predicate: F) -> Result<(), PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        poll_until(predicate, self.timeout, self.interval).await
    }

    pub async fn find<F, Fut, V, E>(&self, check: F) -> Result<V, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        poll_for(check, self.timeout, self.interval).await
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::from(&PollConfig::default())
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        Self::new(
            Duration::from_millis(config.timeout_ms),
            Duration::from_millis(config.interval_ms),
        )
    }
}

/// Check `predicate` every `interval` until it returns `true`.
///
/// Elapsed time is compared with `timeout` before every check; once it exceeds
/// the timeout the poll fails with [`PollError::Timeout`]. At least one check
/// always runs. A predicate error ends the poll immediately as
/// [`PollError::Predicate`].
pub async fn poll_until<F, Fut, E>(
    mut predicate: F,
    timeout: Duration,
    interval: Duration,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    poll_for(
        move || {
            let check = predicate();
            async move { check.await.map(|met| met.then_some(())) }
        },
        timeout,
        interval,
    )
    .await
}

/// Like [`poll_until`], but the check yields the value it was waiting for.
///
/// Stops at the first `Ok(Some(value))` and returns `value`.
pub async fn poll_for<F, Fut, V, E>(
    mut check: F,
    timeout: Duration,
    interval: Duration,
) -> Result<V, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<V>, E>>,
{
    let start = Instant::now();
    let timeout_ms = timeout.as_millis() as u64;
    let mut checks: u32 = 0;

    loop {
        let elapsed = start.elapsed();
        if elapsed > timeout {
            tracing::warn!(
                timeout_ms,
                checks,
                elapsed_ms = elapsed.as_millis() as u64,
                "Condition not met before timeout"
            );
            return Err(PollError::Timeout { timeout_ms, checks });
        }

        checks += 1;
        match check().await {
            Ok(Some(value)) => {
                tracing::debug!(
                    checks,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Condition met"
                );
                return Ok(value);
            }
            Ok(None) => {
                tracing::trace!(check = checks, "Condition not met yet");
            }
            Err(error) => return Err(PollError::Predicate(error)),
        }

        sleep(interval).await;
    }
}
