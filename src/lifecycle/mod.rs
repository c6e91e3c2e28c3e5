//! Test lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Test starts (scope.rs):
//!     Fresh CleanupRegistry → handed to the test body
//!
//! During the test (cleanup.rs):
//!     Resource created → register(teardown)
//!
//! Test ends, pass / fail / panic (scope.rs):
//!     run_all() → actions in reverse order → body outcome returned or panic resumed
//!
//! Interrupt (signals.rs):
//!     SIGINT → scenario abandoned → cleanup still runs
//! ```
//!
//! # Design Decisions
//! - One registry per test; never shared across tests
//! - Teardown failures are diagnostics, not test failures

pub mod cleanup;
pub mod scope;
pub mod signals;

pub use cleanup::{BoxError, CleanupError, CleanupFailure, CleanupRegistry, CleanupReport};
pub use scope::with_cleanup;
