//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Service URLs parse and use http(s)
//! - Budgets and timeouts are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::HarnessConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("poll.interval_ms ({interval_ms}) exceeds poll.timeout_ms ({timeout_ms})")]
    IntervalExceedsTimeout { interval_ms: u64, timeout_ms: u64 },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("services.order_url", &config.services.order_url, &mut errors);
    check_url("services.payment_url", &config.services.payment_url, &mut errors);

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "http.request_timeout_secs",
        });
    }
    if config.http.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "http.connect_timeout_secs",
        });
    }
    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::Zero {
            field: "retry.max_attempts",
        });
    }
    if config.poll.interval_ms > config.poll.timeout_ms {
        errors.push(ValidationError::IntervalExceedsTimeout {
            interval_ms: config.poll.interval_ms,
            timeout_ms: config.poll.timeout_ms,
        });
    }
    if config.scenario.payment_timeout_ms == 0 {
        errors.push(ValidationError::Zero {
            field: "scenario.payment_timeout_ms",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
