//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Fatal startup error: the gateway must not start serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("virtual host {host:?}: cannot open media root {path:?}: {source}")]
    MediaRoot {
        host: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("virtual host {host:?}: cannot open log file {path:?}: {source}")]
    LogFile {
        host: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn parses_full_document() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
            [listener]
            bind_address = "127.0.0.1:8080"

            [timeouts]
            connect_secs = 2
            backend_secs = 30

            [observability]
            log_format = "json"

            [[virtual_hosts]]
            hostname = "a.example"
            media_root = {a:?}
            backend_address = "127.0.0.1:8000"
            directory_listing = true

            [[virtual_hosts]]
            hostname = "b.example"
            media_root = {b:?}
            backend_address = "127.0.0.1:8001"
            static_prefixes = ["/media/", "/media/thumbs/"]
            cache_max_age_secs = 60
            "#,
            a = a.path().display().to_string(),
            b = b.path().display().to_string(),
        );

        let config = parse_config(&toml).unwrap();
        assert_eq!(config.virtual_hosts.len(), 2);
        assert_eq!(config.timeouts.connect_secs, 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.virtual_hosts[0].static_prefixes, vec!["/media/".to_string()]);
        assert!(config.virtual_hosts[0].directory_listing);
        assert_eq!(config.virtual_hosts[1].cache_max_age_secs, 60);
        assert_eq!(config.proxy.pool_idle_per_host, 0);
    }

    #[test]
    fn surfaces_validation_errors() {
        let err = parse_config("").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e == &vec![ValidationError::NoVirtualHosts]));
        assert_eq!(err.to_string(), "validation failed: no virtual hosts configured");
    }

    #[test]
    fn surfaces_parse_errors() {
        let err = parse_config("[[virtual_hosts]]\nhostname = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/missing/gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
