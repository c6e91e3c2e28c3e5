//! Delay primitive.
//!
//! The only place the harness yields to the scheduler while waiting. Backed by the
//! tokio timer, so a paused test clock advances through it instantly.

use std::time::Duration;

/// Suspend the current task for `duration` without blocking the runtime.
///
/// A zero duration still yields once so tight poll loops cannot starve other tasks.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        tokio::task::yield_now().await;
        return;
    }
    tokio::time::sleep(duration).await;
}
