//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call into a service that may not be ready yet:
//!     → retries.rs (re-run a fallible operation, exponential backoff between attempts)
//!     → polling.rs (re-check a condition until it holds or the deadline passes)
//!     → delay.rs   (the single suspension point both of them wait on)
//! ```
//!
//! # Design Decisions
//! - Retries count attempts; polling counts wall-clock time
//! - Every call is stateless: budgets come in as arguments, nothing is shared
//! - No cancellation tokens; a retry or poll always runs to its own conclusion

pub mod backoff;
pub mod delay;
pub mod polling;
pub mod retries;

pub use polling::{poll_for, poll_until, PollError, PollPolicy};
pub use retries::{retry_with_backoff, RetryPolicy};
