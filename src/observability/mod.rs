//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (attempt, delay_ms, order_id, …)
//!     → logging.rs (EnvFilter + fmt layer, pretty or JSON)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's job
//! - Tests leave logging uninitialised unless they opt in

pub mod logging;

pub use logging::init_logging;
