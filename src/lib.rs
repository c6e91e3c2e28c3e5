//! End-to-end verification harness for the order and payment services.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        scenarios                              │
//!   │   health · order→payment flow · consistency · latency         │
//!   └───────┬──────────────────────┬───────────────────────┬───────┘
//!           │                      │                       │
//!           ▼                      ▼                       ▼
//!   ┌──────────────┐      ┌────────────────┐      ┌────────────────┐
//!   │   fixtures   │      │   resilience   │      │   lifecycle    │
//!   │ ids, factory │      │ retry · poll · │      │ cleanup stack, │
//!   │ TestContext  │      │ backoff, delay │      │ scope, signals │
//!   └──────┬───────┘      └────────────────┘      └────────────────┘
//!          │
//!          ▼
//!   ┌──────────────┐      HTTP/JSON      ┌───────────────┐  events  ┌─────────────────┐
//!   │    client    │ ──────────────────▶ │ order service │ ───────▶ │ payment service │
//!   │ order/payment│ ◀────────────────── │  (external)   │          │   (external)    │
//!   └──────────────┘                     └───────────────┘          └─────────────────┘
//!
//!   Cross-cutting: config (TOML + env), observability (tracing)
//! ```

pub mod client;
pub mod config;
pub mod fixtures;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod scenarios;

pub use client::{OrderServiceClient, PaymentServiceClient};
pub use config::HarnessConfig;
pub use fixtures::TestContext;
pub use lifecycle::{with_cleanup, CleanupRegistry};
pub use resilience::{poll_until, retry_with_backoff};
