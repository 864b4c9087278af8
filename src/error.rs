//! Per-request error taxonomy.
//!
//! Startup failures live in [`crate::config::ConfigError`]; everything here is
//! scoped to a single request and maps onto an HTTP status.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

/// Failure to select a virtual host for a request.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Neither a Host header nor a URI authority was present.
    #[error("request carries no host")]
    MissingHost,

    /// The host is not configured. There is no default host to fall back to.
    #[error("no virtual host configured for {0:?}")]
    NoMatchingHost(String),
}

impl RoutingError {
    pub fn status(&self) -> StatusCode {
        match self {
            RoutingError::MissingHost => StatusCode::BAD_REQUEST,
            RoutingError::NoMatchingHost(_) => StatusCode::MISDIRECTED_REQUEST,
        }
    }
}

/// Failure while serving from a media root.
#[derive(Debug, Error)]
pub enum StaticError {
    #[error("path escapes the media root")]
    PathEscapesRoot,

    #[error("file not found")]
    NotFound,

    #[error("permission denied")]
    Forbidden,

    #[error("directory listing is disabled")]
    DirectoryListingDisabled,

    #[error("invalid request path")]
    InvalidPath,

    #[error("requested range not satisfiable for {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    #[error("method {0} not allowed on the media route")]
    MethodNotAllowed(String),

    #[error("I/O error: {0}")]
    Io(std::io::Error),
}

impl StaticError {
    pub fn status(&self) -> StatusCode {
        match self {
            StaticError::PathEscapesRoot => StatusCode::FORBIDDEN,
            StaticError::NotFound => StatusCode::NOT_FOUND,
            StaticError::Forbidden => StatusCode::FORBIDDEN,
            StaticError::DirectoryListingDisabled => StatusCode::NOT_FOUND,
            StaticError::InvalidPath => StatusCode::BAD_REQUEST,
            StaticError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            StaticError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            StaticError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for StaticError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StaticError::NotFound,
            std::io::ErrorKind::PermissionDenied => StaticError::Forbidden,
            _ => StaticError::Io(err),
        }
    }
}

/// Failure while forwarding to a backend.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("backend {address} unreachable: {reason}")]
    BackendUnreachable { address: String, reason: String },

    #[error("backend {address} did not respond within {after:?}")]
    BackendTimeout { address: String, after: Duration },

    #[error("backend {address} failed: {reason}")]
    Upstream { address: String, reason: String },

    #[error("request cannot be forwarded: {0}")]
    InvalidRequest(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}
