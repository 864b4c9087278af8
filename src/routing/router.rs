//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the virtual host table
//! - Classify a request as static-media or application
//! - Return the decision or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) host lookup via HashMap
//! - O(n) path prefix scan (acceptable for typical prefix counts)
//! - Explicit NoMatchingHost rather than silent default

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ConfigError, GatewayConfig, ValidationError};
use crate::error::RoutingError;
use crate::routing::matcher::normalize_host;
use crate::routing::vhost::VirtualHost;

/// Outcome of routing a request.
#[derive(Debug, Clone)]
pub enum RoutingDecision {
    /// Serve `relative_path` (still percent-encoded) from the media root.
    StaticServe {
        vhost: Arc<VirtualHost>,
        relative_path: String,
    },
    /// Forward to the host's backend.
    Proxy { vhost: Arc<VirtualHost> },
}

impl RoutingDecision {
    pub fn vhost(&self) -> &Arc<VirtualHost> {
        match self {
            RoutingDecision::StaticServe { vhost, .. } | RoutingDecision::Proxy { vhost } => vhost,
        }
    }
}

/// Host table keyed by normalized host name.
#[derive(Debug, Default)]
pub struct Router {
    hosts: HashMap<String, Arc<VirtualHost>>,
}

impl Router {
    /// Build the table from already constructed hosts.
    pub fn new(vhosts: Vec<VirtualHost>) -> Result<Self, ConfigError> {
        let mut hosts = HashMap::with_capacity(vhosts.len());
        for vhost in vhosts {
            let name = vhost.hostname().to_string();
            if hosts.insert(name.clone(), Arc::new(vhost)).is_some() {
                return Err(ConfigError::Validation(vec![
                    ValidationError::DuplicateHostname(name),
                ]));
            }
        }
        Ok(Self { hosts })
    }

    /// Build every virtual host in the configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let vhosts = config
            .virtual_hosts
            .iter()
            .map(VirtualHost::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(vhosts)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn get(&self, host: &str) -> Option<&Arc<VirtualHost>> {
        normalize_host(host).and_then(|h| self.hosts.get(&h))
    }

    /// Classify a request by host and path.
    pub fn route(&self, host: Option<&str>, path: &str) -> Result<RoutingDecision, RoutingError> {
        let host = host.ok_or(RoutingError::MissingHost)?;
        let vhost = self
            .get(host)
            .ok_or_else(|| RoutingError::NoMatchingHost(host.to_string()))?;

        let decision = match vhost.static_path(path) {
            Some(relative) => RoutingDecision::StaticServe {
                vhost: Arc::clone(vhost),
                relative_path: relative.to_string(),
            },
            None => RoutingDecision::Proxy {
                vhost: Arc::clone(vhost),
            },
        };
        Ok(decision)
    }
}
