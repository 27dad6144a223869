//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, timeout)
//! - Check upstream URLs are usable by the HTTP client
//! - Detect overlapping route prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::matcher::prefix_matches;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener port must be non-zero")]
    InvalidPort,

    #[error("at least one service must be configured")]
    NoServices,

    #[error("duplicate service name '{0}'")]
    DuplicateService(String),

    #[error("service '{service}': path prefix '{prefix}' must start with '/'")]
    InvalidPrefix { service: String, prefix: String },

    #[error("services '{first}' and '{second}' have overlapping path prefixes")]
    OverlappingPrefixes { first: String, second: String },

    #[error("service '{service}': upstream URL is not set")]
    MissingUrl { service: String },

    #[error("service '{service}': invalid upstream URL '{url}': {reason}")]
    InvalidUrl {
        service: String,
        url: String,
        reason: String,
    },

    #[error("upstream timeout must be greater than zero")]
    InvalidTimeout,
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::InvalidTimeout);
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateService(service.name.clone()));
        }

        if !service.path_prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                service: service.name.clone(),
                prefix: service.path_prefix.clone(),
            });
        }

        if let Err(e) = check_url(&service.name, &service.url) {
            errors.push(e);
        }
    }

    // Same comparison the router uses, so case-only differences overlap too.
    for (i, first) in config.services.iter().enumerate() {
        for second in &config.services[i + 1..] {
            if prefix_matches(&first.path_prefix, &second.path_prefix)
                || prefix_matches(&second.path_prefix, &first.path_prefix)
            {
                errors.push(ValidationError::OverlappingPrefixes {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(service: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingUrl {
            service: service.to_string(),
        });
    }

    let invalid = |reason: String| ValidationError::InvalidUrl {
        service: service.to_string(),
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    // The upstream client speaks plain HTTP only.
    if url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("base URL must not carry a query or fragment".to_string()));
    }
    Ok(())
}
