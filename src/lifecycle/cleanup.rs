//! Test-scoped teardown.
//!
//! A deferred-action stack: actions registered while a test runs are released in
//! LIFO order once it finishes, mirroring the order resources were acquired in.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

/// Boxed error accepted from cleanup actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type CleanupAction = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>;

struct Registered {
    label: Option<String>,
    action: CleanupAction,
}

/// How a single cleanup action failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CleanupError {
    #[error("cleanup action failed: {0}")]
    Failed(String),

    #[error("cleanup action panicked: {0}")]
    Panicked(String),
}

/// A cleanup action that did not complete.
#[derive(Debug, Clone)]
pub struct CleanupFailure {
    /// Zero-based registration index.
    pub position: usize,
    pub label: Option<String>,
    pub error: CleanupError,
}

/// Outcome of [`CleanupRegistry::run_all`].
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    /// Number of actions invoked.
    pub ran: usize,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Inner {
    actions: Mutex<Vec<Registered>>,
}

impl Inner {
    fn actions(&self) -> MutexGuard<'_, Vec<Registered>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self
            .actions
            .get_mut()
            .map(|a| a.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len());
        if pending > 0 {
            tracing::warn!(pending, "Cleanup registry dropped with actions that never ran");
        }
    }
}

/// Ordered collection of teardown actions for one test.
///
/// Cloning yields another handle to the same registry, so helpers deep inside a
/// test body can register actions without threading `&mut` through every call.
#[derive(Clone)]
pub struct CleanupRegistry {
    inner: Arc<Inner>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                actions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Append an action; it runs before everything registered earlier.
    pub fn register<F, Fut, E>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.push(None, action);
    }

    /// Append an action with a label used in diagnostics.
    pub fn register_named<F, Fut, E>(&self, label: impl Into<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.push(Some(label.into()), action);
    }

    fn push<F, Fut, E>(&self, label: Option<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let action: CleanupAction =
            Box::new(move || async move { action().await.map_err(Into::<BoxError>::into) }.boxed());
        let mut actions = self.inner.actions();
        tracing::trace!(position = actions.len(), label = ?label, "Cleanup action registered");
        actions.push(Registered { label, action });
    }

    /// Number of actions waiting to run.
    pub fn len(&self) -> usize {
        self.inner.actions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every registered action, most recent first, then clear the list.
    ///
    /// Errors and panics are caught per action and logged; the remaining actions
    /// still run. The registry is empty (and reusable) afterwards.
    pub async fn run_all(&self) -> CleanupReport {
        let actions = std::mem::take(&mut *self.inner.actions());
        let mut report = CleanupReport::default();

        if actions.is_empty() {
            return report;
        }
        tracing::debug!(count = actions.len(), "Running cleanup actions");

        for (position, registered) in actions.into_iter().enumerate().rev() {
            let Registered { label, action } = registered;
            report.ran += 1;

            let outcome = AssertUnwindSafe(async move { action().await })
                .catch_unwind()
                .await;

            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => CleanupError::Failed(e.to_string()),
                Err(panic) => CleanupError::Panicked(panic_message(panic.as_ref())),
            };

            tracing::error!(
                position,
                label = label.as_deref().unwrap_or("-"),
                error = %error,
                "Cleanup error"
            );
            report.failures.push(CleanupFailure {
                position,
                label,
                error,
            });
        }

        report
    }
}

impl Default for CleanupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("pending", &self.len())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
