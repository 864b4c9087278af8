//! Request inspection.
//!
//! # Responsibilities
//! - Extract routing-relevant information (host, path)
//! - Read the request ID assigned by the request-id layer
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - HTTP/2 requests carry the host in the URI authority, not a header

use axum::{
    body::Body,
    http::{header, HeaderName, Request},
};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The host the client addressed: Host header, else URI authority.
pub fn request_host(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))
        .filter(|h| !h.trim().is_empty())
}

/// The request ID, or `-` when none was assigned.
pub fn request_id(request: &Request<Body>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Path and query as received, for logs.
pub fn request_target(request: &Request<Body>) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_wins_over_authority() {
        let req = Request::builder()
            .uri("http://authority.example/x")
            .header("Host", "header.example:8080")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req).as_deref(), Some("header.example:8080"));
    }

    #[test]
    fn falls_back_to_authority() {
        let req = Request::builder()
            .uri("http://authority.example/x")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req).as_deref(), Some("authority.example"));

        let req = Request::builder().uri("/x").body(Body::empty()).unwrap();
        assert_eq!(request_host(&req), None);
    }

    #[test]
    fn request_id_and_target() {
        let req = Request::builder()
            .uri("/media/a.jpg?v=2")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc-123");
        assert_eq!(request_target(&req), "/media/a.jpg?v=2");

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&req), "-");
    }
}
