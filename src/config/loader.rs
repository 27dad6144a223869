//! Configuration loading from a TOML file and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names a TOML file used as the base configuration.
pub const CONFIG_FILE_VAR: &str = "GATEWAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the startup configuration.
///
/// Reads `.env` if present, starts from the TOML file named by
/// `GATEWAY_CONFIG` (or defaults), then applies environment overrides.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = ?path, "Loaded .env file");
    }

    let base = match std::env::var(CONFIG_FILE_VAR) {
        Ok(path) if !path.is_empty() => {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        }
        _ => GatewayConfig::default(),
    };

    let config = apply_overrides(base, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides from `lookup` onto `config`.
///
/// Empty values are treated as unset.
pub fn apply_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: "PORT",
            reason: format!("{}", e),
        })?;
    }

    if let Some(env) = get("APP_ENV") {
        config.environment = env;
    }

    for (name, var) in [
        ("products", "PRODUCTS_SERVICE_URL"),
        ("newsletter", "NEWSLETTER_SERVICE_URL"),
        ("search", "SEARCH_SERVICE_URL"),
    ] {
        if let Some(url) = get(var) {
            match config.service_mut(name) {
                Some(service) => service.url = url,
                None => tracing::warn!(service = name, var, "No such service configured, ignoring override"),
            }
        }
    }

    if let Some(secs) = get("GATEWAY_UPSTREAM_TIMEOUT_SECS") {
        let secs = secs.trim().parse().map_err(|e| ConfigError::Env {
            var: "GATEWAY_UPSTREAM_TIMEOUT_SECS",
            reason: format!("{}", e),
        })?;
        config.timeouts.upstream_secs = Some(secs);
    }

    if let Some(addr) = get("GATEWAY_METRICS_ADDRESS") {
        config.observability.metrics_address = Some(addr);
    }

    Ok(config)
}
