//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every media root exists and can be listed
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate host names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::config::schema::GatewayConfig;
use crate::routing::matcher::normalize_host;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no virtual hosts configured")]
    NoVirtualHosts,

    #[error("listener bind address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("listener.max_concurrent_requests must be greater than zero")]
    ZeroConcurrency,

    #[error("listener.max_concurrent_requests {requested} exceeds the limit of {max}")]
    ConcurrencyTooHigh { requested: usize, max: usize },

    /// The connect timeout has to expire before the response deadline does.
    #[error("timeouts.backend_secs ({backend}) must be greater than timeouts.connect_secs ({connect})")]
    BackendDeadlineWithinConnect { connect: u64, backend: u64 },

    #[error("virtual host #{0} has an empty hostname")]
    EmptyHostname(usize),

    #[error("virtual host {0:?} is configured more than once")]
    DuplicateHostname(String),

    #[error("virtual host {host:?}: backend address {address:?} is not a socket address")]
    InvalidBackendAddress { host: String, address: String },

    #[error("virtual host {host:?}: media root {path:?} is not a readable directory")]
    UnreadableMediaRoot { host: String, path: PathBuf },

    #[error("virtual host {host:?}: static prefix {prefix:?} must start and end with '/'")]
    InvalidStaticPrefix { host: String, prefix: String },
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    let concurrency = config.listener.max_concurrent_requests;
    if concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    } else if concurrency > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::ConcurrencyTooHigh {
            requested: concurrency,
            max: Semaphore::MAX_PERMITS,
        });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.backend_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("backend_secs"));
    }
    let (connect, backend) = (config.timeouts.connect_secs, config.timeouts.backend_secs);
    if connect > 0 && backend > 0 && backend <= connect {
        errors.push(ValidationError::BackendDeadlineWithinConnect { connect, backend });
    }

    if config.virtual_hosts.is_empty() {
        errors.push(ValidationError::NoVirtualHosts);
    }

    let mut seen = HashSet::new();
    for (index, vhost) in config.virtual_hosts.iter().enumerate() {
        let Some(host) = normalize_host(&vhost.hostname) else {
            errors.push(ValidationError::EmptyHostname(index));
            continue;
        };

        if !seen.insert(host.clone()) {
            errors.push(ValidationError::DuplicateHostname(host.clone()));
        }

        if vhost.backend_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBackendAddress {
                host: host.clone(),
                address: vhost.backend_address.clone(),
            });
        }

        let readable = vhost.media_root.is_dir() && std::fs::read_dir(&vhost.media_root).is_ok();
        if !readable {
            errors.push(ValidationError::UnreadableMediaRoot {
                host: host.clone(),
                path: vhost.media_root.clone(),
            });
        }

        for prefix in &vhost.static_prefixes {
            if !prefix.starts_with('/') || !prefix.ends_with('/') {
                errors.push(ValidationError::InvalidStaticPrefix {
                    host: host.clone(),
                    prefix: prefix.clone(),
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
