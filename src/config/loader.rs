//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the order service URL.
pub const ORDER_URL_ENV: &str = "E2E_ORDER_SERVICE_URL";
/// Overrides the payment service URL.
pub const PAYMENT_URL_ENV: &str = "E2E_PAYMENT_SERVICE_URL";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "E2E_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    load_with_overrides(Some(path), |_| {})
}

/// Load `path` if given, otherwise start from defaults; env overrides apply either way.
pub fn load_or_default(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    load_with_overrides(path, |_| {})
}

/// Like [`load_or_default`], with `overrides` applied after the environment.
///
/// Validation runs once, on the fully layered result: file, then environment,
/// then `overrides`.
pub fn load_with_overrides<F>(
    path: Option<&Path>,
    overrides: F,
) -> Result<HarnessConfig, ConfigError>
where
    F: FnOnce(&mut HarnessConfig),
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let config: HarnessConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "Configuration file read");
            config
        }
        None => HarnessConfig::default(),
    };

    apply_env_overrides(&mut config);
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut HarnessConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary lookup; empty values are ignored.
pub fn apply_overrides<F>(config: &mut HarnessConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ORDER_URL_ENV) {
        config.services.order_url = url;
    }
    if let Some(url) = get(PAYMENT_URL_ENV) {
        config.services.payment_url = url;
    }
    if let Some(level) = get(LOG_LEVEL_ENV) {
        config.observability.log_level = level;
    }
}
