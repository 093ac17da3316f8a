//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Accept host names for the listener; the metrics exporter needs an IP
//! - Check that simulated work fits inside the request timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::HarnessConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("path prefix '{0}' must start with '/' and not end with '/'")]
    InvalidPathPrefix(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("simulation.delay_spread_ms must be greater than zero")]
    ZeroDelaySpread,

    #[error("simulation.max_log_count must be greater than zero when set")]
    ZeroMaxLogCount,

    #[error("simulation.default_log_count {default} exceeds max_log_count {max}")]
    DefaultCountAboveMax { default: u64, max: u64 },

    #[error("maximum processing delay {delay_ms}ms does not fit in request timeout {timeout_secs}s")]
    DelayExceedsTimeout { delay_ms: u64, timeout_secs: u64 },

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// A socket address, or a `host:port` pair resolved when the listener binds.
fn is_bindable(address: &str) -> bool {
    if address.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match address.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bindable(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    let prefix = &config.api.path_prefix;
    if !prefix.is_empty() && prefix != "/" && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let sim = &config.simulation;
    if sim.delay_spread_ms == 0 {
        errors.push(ValidationError::ZeroDelaySpread);
    }

    match sim.max_log_count {
        Some(0) => errors.push(ValidationError::ZeroMaxLogCount),
        Some(max) if sim.default_log_count > max => {
            errors.push(ValidationError::DefaultCountAboveMax {
                default: sim.default_log_count,
                max,
            });
        }
        _ => {}
    }

    let timeout_ms = config.timeouts.request_secs.saturating_mul(1000);
    if config.timeouts.request_secs > 0 && sim.max_delay_ms() >= timeout_ms {
        errors.push(ValidationError::DelayExceedsTimeout {
            delay_ms: sim.max_delay_ms(),
            timeout_secs: config.timeouts.request_secs,
        });
    }

    if EnvFilter::try_new(&obs.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
