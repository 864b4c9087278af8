//! Static media serving.
//!
//! # Data Flow
//! ```text
//! StaticServe(vhost, relative path)
//!     → method check (GET, HEAD, OPTIONS)
//!     → resolve.rs (decode, reject traversal, canonicalize under the root)
//!     → directory? listing.rs (if enabled) : range.rs + body.rs (stream file)
//!     → cors.rs (on every response, errors included)
//! ```
//!
//! # Design Decisions
//! - Files are streamed in chunks, never buffered whole
//! - Only regular files are served; sockets, FIFOs and devices are NotFound
//! - Conditional GET uses Last-Modified at one-second resolution

pub mod body;
pub mod cors;
pub mod listing;
pub mod range;
pub mod resolve;

use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::StaticError;
use crate::routing::VirtualHost;
use self::range::RangeOutcome;

/// Methods accepted on the media route.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Serve `relative_path` from the host's media root.
///
/// Successful responses already carry the CORS headers; errors get them when
/// converted with [`IntoResponse`].
pub async fn serve_static(
    vhost: &VirtualHost,
    relative_path: &str,
    request: &Parts,
) -> Result<Response, StaticError> {
    let mut response = match request.method {
        Method::OPTIONS => preflight(),
        Method::GET | Method::HEAD => serve_path(vhost, relative_path, request).await?,
        ref other => return Err(StaticError::MethodNotAllowed(other.to_string())),
    };
    cors::apply(response.headers_mut());
    Ok(response)
}

fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    cors::apply_preflight(response.headers_mut());
    response
}

async fn serve_path(
    vhost: &VirtualHost,
    relative_path: &str,
    request: &Parts,
) -> Result<Response, StaticError> {
    let path = resolve::resolve(vhost.media_root(), relative_path).await?;
    let metadata = tokio::fs::metadata(&path).await?;

    if metadata.is_dir() {
        if !vhost.directory_listing() {
            return Err(StaticError::DirectoryListingDisabled);
        }
        return directory_response(&path, request).await;
    }
    if !metadata.is_file() {
        return Err(StaticError::NotFound);
    }
    file_response(vhost, &path, &metadata, request).await
}

async fn directory_response(dir: &Path, request: &Parts) -> Result<Response, StaticError> {
    let entries = listing::read_entries(dir).await?;
    let wants_json = header_str(&request.headers, header::ACCEPT)
        .is_some_and(|accept| accept.contains("application/json"));

    let (content_type, body) = if wants_json {
        let json = listing::render_json(&entries)
            .map_err(|e| StaticError::Io(std::io::Error::other(e)))?;
        ("application/json", json)
    } else {
        (
            "text/html; charset=utf-8",
            listing::render_html(request.uri.path(), &entries),
        )
    };

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        body,
    )
        .into_response())
}

async fn file_response(
    vhost: &VirtualHost,
    path: &Path,
    metadata: &Metadata,
    request: &Parts,
) -> Result<Response, StaticError> {
    // Opened before anything else so permission problems surface as 403.
    let file = tokio::fs::File::open(path).await?;
    let size = metadata.len();
    let modified = metadata.modified().ok().map(truncate_to_seconds);
    let range_header = header_str(&request.headers, header::RANGE);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        header_value(format!("public, max-age={}", vhost.cache_max_age_secs())),
    );
    if let Some(modified) = modified {
        headers.insert(
            header::LAST_MODIFIED,
            header_value(httpdate::fmt_http_date(modified)),
        );
    }

    if range_header.is_none() && not_modified(&request.headers, modified) {
        return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
    }

    let (status, start, len) = match range::evaluate(range_header, size) {
        RangeOutcome::Full => (StatusCode::OK, 0, size),
        RangeOutcome::Partial(slice) => {
            headers.insert(header::CONTENT_RANGE, header_value(slice.content_range(size)));
            (StatusCode::PARTIAL_CONTENT, slice.start, slice.content_length())
        }
        RangeOutcome::Unsatisfiable => return Err(StaticError::RangeNotSatisfiable { size }),
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    headers.insert(header::CONTENT_TYPE, header_value(mime.to_string()));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    let body = if request.method == Method::HEAD || len == 0 {
        Body::empty()
    } else {
        body::file_body(file, start, len).await?
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().extend(headers);
    Ok(response)
}

/// True when If-Modified-Since is at or after the file's modification time.
fn not_modified(headers: &HeaderMap, modified: Option<SystemTime>) -> bool {
    let (Some(modified), Some(since)) = (modified, header_str(headers, header::IF_MODIFIED_SINCE))
    else {
        return false;
    };
    match httpdate::parse_http_date(since) {
        Ok(since) => modified <= since,
        Err(_) => false,
    }
}

/// HTTP dates have one-second resolution.
fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_value(value: String) -> HeaderValue {
    // Only built from ASCII we format ourselves.
    HeaderValue::try_from(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

impl IntoResponse for StaticError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, status.canonical_reason().unwrap_or("error")).into_response();
        let headers = response.headers_mut();
        match &self {
            StaticError::RangeNotSatisfiable { size } => {
                headers.insert(
                    header::CONTENT_RANGE,
                    header_value(range::unsatisfiable_content_range(*size)),
                );
            }
            StaticError::MethodNotAllowed(_) => {
                headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
            }
            _ => {}
        }
        cors::apply(headers);
        response
    }
}
