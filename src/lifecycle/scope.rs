//! Per-test scope with guaranteed teardown.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use crate::lifecycle::cleanup::CleanupRegistry;

/// Run `body` with a fresh [`CleanupRegistry`], then run its actions.
///
/// Cleanup happens whether the body returns or panics. A panic is resumed after
/// cleanup so the test still fails with its own panic message; cleanup failures
/// are only logged.
pub async fn with_cleanup<F, Fut, T>(body: F) -> T
where
    F: FnOnce(CleanupRegistry) -> Fut,
    Fut: Future<Output = T>,
{
    let registry = CleanupRegistry::new();
    let handle = registry.clone();

    let outcome = AssertUnwindSafe(async move { body(handle).await })
        .catch_unwind()
        .await;

    let report = registry.run_all().await;
    if !report.is_clean() {
        tracing::warn!(
            failed = report.failures.len(),
            ran = report.ran,
            "Cleanup finished with errors"
        );
    }

    match outcome {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
