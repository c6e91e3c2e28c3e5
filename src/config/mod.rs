//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, E2E_* env overrides)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → clients, retry/poll policies, scenarios
//! ```
//!
//! # Design Decisions
//! - All fields have defaults pointing at a local stack, so no file is required
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, load_with_overrides, ConfigError};
pub use schema::{
    HarnessConfig, HttpConfig, ObservabilityConfig, PollConfig, RetryConfig, ScenarioConfig,
    ServicesConfig,
};
