//! OS signal handling.
//!
//! Lets a long-running scenario stop waiting on Ctrl-C while still giving its
//! cleanup actions a chance to run.

/// Resolve once the process receives SIGINT (Ctrl-C).
///
/// If the handler cannot be installed the future never resolves, so the caller
/// simply runs to completion.
pub async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::warn!("Interrupt received, abandoning scenario"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
