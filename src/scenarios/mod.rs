//! Cross-service verification scenarios.
//!
//! # Data Flow
//! ```text
//! TestContext (clients + policies + cleanup)
//!     → health::ensure_services_healthy   (retry until both report UP)
//!     → flow::order_to_payment            (create → poll payment → compare)
//!     → consistency::verify_user_consistency / verify_payment_stats
//!     → latency::* (single calls against configured budgets)
//!     → FlowReport / ConsistencyReport | ScenarioError
//! ```
//!
//! # Design Decisions
//! - Scenarios are library code so the CLI and the integration suites share them
//! - Waiting for the event consumer is always a bounded poll, never a fixed sleep
//! - Money is compared with a small absolute tolerance

pub mod consistency;
pub mod flow;
pub mod health;
pub mod latency;

use std::time::Duration;

use thiserror::Error;

use crate::client::ClientError;
use crate::resilience::PollError;

pub use consistency::{verify_payment_stats, verify_user_consistency, ConsistencyReport};
pub use flow::{
    await_payment, await_user_payments, cancel_on_teardown, order_to_payment, order_to_payment_with,
    FlowReport,
};
pub use health::{ensure_services_healthy, ServicesHealth};
pub use latency::{create_order_within_budget, list_payments_within_budget};

/// Absolute tolerance for comparing monetary amounts.
pub const AMOUNT_EPSILON: f64 = 0.005;

/// A scenario step that did not hold.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Waiting for {what} failed: {source}")]
    Wait {
        what: String,
        #[source]
        source: PollError<ClientError>,
    },

    #[error("{subject}: expected {field} = {expected}, got {actual}")]
    Mismatch {
        subject: String,
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("{service} reported status {status}")]
    Unhealthy { service: &'static str, status: String },

    #[error("{operation} took {elapsed_ms}ms, budget is {budget_ms}ms")]
    TooSlow {
        operation: &'static str,
        elapsed_ms: u64,
        budget_ms: u64,
    },
}

/// Result type for scenarios.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

pub(crate) fn amounts_match(a: f64, b: f64) -> bool {
    (a - b).abs() < AMOUNT_EPSILON
}

pub(crate) fn ensure_eq<T>(
    subject: &str,
    field: &'static str,
    expected: T,
    actual: T,
) -> ScenarioResult<()>
where
    T: PartialEq + std::fmt::Display,
{
    if expected == actual {
        Ok(())
    } else {
        Err(ScenarioError::Mismatch {
            subject: subject.to_string(),
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

pub(crate) fn ensure_amount(
    subject: &str,
    field: &'static str,
    expected: f64,
    actual: f64,
) -> ScenarioResult<()> {
    if amounts_match(expected, actual) {
        Ok(())
    } else {
        Err(ScenarioError::Mismatch {
            subject: subject.to_string(),
            field,
            expected: format!("{:.2}", expected),
            actual: format!("{:.2}", actual),
        })
    }
}

pub(crate) fn ensure_within(
    operation: &'static str,
    elapsed: Duration,
    budget_ms: u64,
) -> ScenarioResult<()> {
    let elapsed_ms = elapsed.as_millis() as u64;
    if elapsed_ms < budget_ms {
        Ok(())
    } else {
        Err(ScenarioError::TooSlow {
            operation,
            elapsed_ms,
            budget_ms,
        })
    }
}
