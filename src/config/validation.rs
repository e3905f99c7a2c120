//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! All problems are reported, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// Upper bound accepted for `idempotency.max_key_length`.
pub const MAX_KEY_LENGTH_LIMIT: usize = 1024;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    let max_key = config.idempotency.max_key_length;
    if max_key == 0 || max_key > MAX_KEY_LENGTH_LIMIT {
        errors.push(ValidationError::new(
            "idempotency.max_key_length",
            format!("must be between 1 and {MAX_KEY_LENGTH_LIMIT}"),
        ));
    }

    if config.submitter.submit_timeout_ms == 0 {
        errors.push(ValidationError::new("submitter.submit_timeout_ms", "must be > 0"));
    }
    let rate = config.submitter.failure_rate;
    if !(0.0..=1.0).contains(&rate) {
        errors.push(ValidationError::new(
            "submitter.failure_rate",
            "must be between 0.0 and 1.0",
        ));
    }

    if config.chains.is_empty() {
        errors.push(ValidationError::new("chains", "at least one chain must be configured"));
    }
    for (chain, rules) in &config.chains {
        if rules.address.prefix.is_empty() {
            errors.push(ValidationError::new(
                format!("chains.{chain}.address.prefix"),
                "must not be empty",
            ));
        }
        if rules.address.hex_digits == 0 {
            errors.push(ValidationError::new(
                format!("chains.{chain}.address.hex_digits"),
                "must be > 0",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
