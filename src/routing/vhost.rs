//! Virtual host records.
//!
//! Built once at startup from [`VirtualHostConfig`] and shared read-only
//! for the rest of the process lifetime.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ValidationError, VirtualHostConfig};
use crate::observability::access_log::VhostLogs;
use crate::routing::matcher::{normalize_host, PathPrefixMatcher};

/// A named site: media root, backend and log streams.
#[derive(Debug)]
pub struct VirtualHost {
    hostname: String,
    media_root: PathBuf,
    backend_address: SocketAddr,
    /// Sorted longest prefix first.
    static_prefixes: Vec<PathPrefixMatcher>,
    directory_listing: bool,
    cache_max_age_secs: u64,
    logs: VhostLogs,
}

impl VirtualHost {
    /// Build the record: canonicalize the media root, parse the backend
    /// address and open the log files.
    pub fn from_config(config: &VirtualHostConfig) -> Result<Self, ConfigError> {
        let hostname = normalize_host(&config.hostname)
            .ok_or_else(|| ConfigError::Validation(vec![ValidationError::EmptyHostname(0)]))?;

        let backend_address = config.backend_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidBackendAddress {
                host: hostname.clone(),
                address: config.backend_address.clone(),
            }])
        })?;

        let media_root = std::fs::canonicalize(&config.media_root).map_err(|source| {
            ConfigError::MediaRoot {
                host: hostname.clone(),
                path: config.media_root.clone(),
                source,
            }
        })?;

        let mut static_prefixes: Vec<PathPrefixMatcher> = config
            .static_prefixes
            .iter()
            .map(|prefix| PathPrefixMatcher::new(prefix.clone()))
            .collect();
        static_prefixes.sort_by(|a, b| b.prefix().len().cmp(&a.prefix().len()));

        let logs = VhostLogs::open(
            &hostname,
            config.access_log.as_deref(),
            config.error_log.as_deref(),
        )?;

        Ok(Self {
            hostname,
            media_root,
            backend_address,
            static_prefixes,
            directory_listing: config.directory_listing,
            cache_max_age_secs: config.cache_max_age_secs,
            logs,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Canonical media root.
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn backend_address(&self) -> SocketAddr {
        self.backend_address
    }

    pub fn directory_listing(&self) -> bool {
        self.directory_listing
    }

    pub fn cache_max_age_secs(&self) -> u64 {
        self.cache_max_age_secs
    }

    pub fn logs(&self) -> &VhostLogs {
        &self.logs
    }

    /// The path relative to the matching static prefix, longest prefix first.
    pub fn static_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.static_prefixes
            .iter()
            .find_map(|matcher| matcher.strip(path))
    }
}
