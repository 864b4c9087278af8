//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Virtual hosts served by this process.
    pub virtual_hosts: Vec<VirtualHostConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Backend client settings.
    pub proxy: ProxyClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum requests handled at the same time (backpressure).
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_concurrent_requests: 10_000,
        }
    }
}

/// One named site: a media root and the backend behind it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VirtualHostConfig {
    /// Host name matched exactly (case-insensitive, port ignored).
    pub hostname: String,

    /// Directory served under the static prefixes.
    pub media_root: PathBuf,

    /// Backend address (e.g., "127.0.0.1:8000").
    pub backend_address: String,

    /// Path prefixes served from `media_root`.
    #[serde(default = "default_static_prefixes")]
    pub static_prefixes: Vec<String>,

    /// Render an index for directory requests.
    #[serde(default)]
    pub directory_listing: bool,

    /// `max-age` advertised on static file responses.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    /// Append-only access log file.
    #[serde(default)]
    pub access_log: Option<PathBuf>,

    /// Append-only error log file.
    #[serde(default)]
    pub error_log: Option<PathBuf>,
}

fn default_static_prefixes() -> Vec<String> {
    vec!["/media/".to_string()]
}

fn default_cache_max_age() -> u64 {
    86_400
}

impl VirtualHostConfig {
    /// A host with default prefixes, no listing and no log files.
    pub fn new(
        hostname: impl Into<String>,
        media_root: impl Into<PathBuf>,
        backend_address: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            media_root: media_root.into(),
            backend_address: backend_address.into(),
            static_prefixes: default_static_prefixes(),
            directory_listing: false,
            cache_max_age_secs: default_cache_max_age(),
            access_log: None,
            error_log: None,
        }
    }
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for the backend's response head, in seconds.
    pub backend_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            backend_secs: 60,
        }
    }
}

/// Backend HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyClientConfig {
    /// Idle keep-alive connections kept per backend. 0 opens one
    /// connection per proxied request.
    pub pool_idle_per_host: usize,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
