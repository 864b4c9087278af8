//! Application-route forwarding.
//!
//! # Data Flow
//! ```text
//! Proxy(vhost)
//!     → headers.rs (strip hop-by-hop, Host / X-Real-IP / X-Forwarded-*)
//!     → forwarder.rs (connect with timeout, await response head with deadline)
//!     → backend response relayed as-is, body streamed
//! ```
//!
//! # Design Decisions
//! - Connect failures → 502, missing response head by the deadline → 504
//! - No retries
//! - Dropping the relayed body (client disconnect) closes the backend stream

pub mod forwarder;
pub mod headers;

pub use forwarder::Forwarder;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.status();
        (status, status.canonical_reason().unwrap_or("error")).into_response()
    }
}
