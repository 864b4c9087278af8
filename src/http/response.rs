//! Response helpers.
//!
//! # Responsibilities
//! - Map routing errors to HTTP status codes
//! - Report body size for access logs
//!
//! # Design Decisions
//! - Backend responses are relayed untouched; nothing here rewrites them
//! - Streaming responses avoid buffering entire body

use axum::{
    body::Body,
    http::{header, Method, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::RoutingError;

impl IntoResponse for RoutingError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.status();
        (status, status.canonical_reason().unwrap_or("error")).into_response()
    }
}

/// Bytes of body sent for `method`: zero for HEAD, else the declared
/// Content-Length when there is one.
pub fn sent_length(method: &Method, response: &HttpResponse<Body>) -> Option<u64> {
    if *method == Method::HEAD {
        return Some(0);
    }
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
