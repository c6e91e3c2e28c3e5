//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! every section falls back to defaults matching a local docker-compose stack.

use serde::{Deserialize, Serialize};

/// Root configuration for the verification harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Where the services under test live.
    pub services: ServicesConfig,

    /// HTTP client settings.
    pub http: HttpConfig,

    /// Default retry budget for flaky calls.
    pub retry: RetryConfig,

    /// Default bounds for eventual-consistency waits.
    pub poll: PollConfig,

    /// Scenario-specific waits and latency budgets.
    pub scenario: ScenarioConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Base URLs of the services under test.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    /// Order service API root (e.g., "http://localhost:8081/api").
    pub order_url: String,

    /// Payment service API root (e.g., "http://localhost:8082/api").
    pub payment_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            order_url: "http://localhost:8081/api".to_string(),
            payment_url: "http://localhost:8082/api".to_string(),
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Delay after the first failure in milliseconds; doubles each time.
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 1000,
        }
    }
}

/// Polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    /// Give up once this much wall-clock time has passed.
    pub timeout_ms: u64,

    /// Wait between checks.
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            interval_ms: 1000,
        }
    }
}

/// Knobs of the cross-service scenarios.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    /// How long to wait for the payment of a new order.
    pub payment_timeout_ms: u64,

    /// How often to look for that payment.
    pub payment_interval_ms: u64,

    /// Latency budget for creating an order.
    pub max_order_create_ms: u64,

    /// Latency budget for listing payments.
    pub max_payment_lookup_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            payment_timeout_ms: 30_000,
            payment_interval_ms: 2000,
            max_order_create_ms: 2000,
            max_payment_lookup_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
