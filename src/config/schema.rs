//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the log harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoint mounting.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Simulated latency and log generation settings.
    pub simulation: SimulationConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where the endpoints are mounted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Common path prefix of all endpoints. "/" mounts them at the root.
    pub path_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/api".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Simulated work and log generation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Minimum simulated processing delay in milliseconds.
    pub min_delay_ms: u64,

    /// Width of the random part of the delay; the delay is drawn from
    /// `[min_delay_ms, min_delay_ms + delay_spread_ms)`.
    pub delay_spread_ms: u64,

    /// Entries generated when the caller gives no `count`.
    pub default_log_count: u64,

    /// Largest accepted `count`. Unbounded when unset.
    pub max_log_count: Option<u64>,

    /// Seed for reproducible delays and severities.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Longest delay the process endpoint can draw.
    pub fn max_delay_ms(&self) -> u64 {
        self.min_delay_ms
            .saturating_add(self.delay_spread_ms)
            .saturating_sub(1)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 100,
            delay_spread_ms: 1000,
            default_log_count: 10,
            max_log_count: None,
            seed: None,
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
