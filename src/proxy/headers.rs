//! Header manipulation for forwarded requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers
//! - Preserve the original Host and expose it as X-Forwarded-Host
//! - Add X-Real-IP and append the client to X-Forwarded-For
//!
//! # Design Decisions
//! - The forwarding chain is parsed into an ordered list and re-joined,
//!   never string-concatenated onto whatever was there
//! - Multiple X-Forwarded-For header lines are merged in order

use std::net::IpAddr;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::error::ProxyError;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Headers meaningful only for a single transport-level connection.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
];

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove(header::UPGRADE);
}

/// The existing forwarding chain, in hop order.
pub fn forwarded_chain(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add the forwarding headers for a request from `client` addressed to
/// `original_host`.
pub fn apply_forwarding(
    headers: &mut HeaderMap,
    original_host: &str,
    client: IpAddr,
) -> Result<(), ProxyError> {
    let host = HeaderValue::from_str(original_host)
        .map_err(|_| ProxyError::InvalidRequest("host header is not a valid value".into()))?;
    headers.insert(header::HOST, host.clone());
    headers.insert(X_FORWARDED_HOST, host);

    let client = client.to_string();
    let mut chain = forwarded_chain(headers);
    chain.push(client.clone());
    let chain = HeaderValue::from_str(&chain.join(", "))
        .map_err(|_| ProxyError::InvalidRequest("x-forwarded-for is not a valid value".into()))?;
    headers.insert(X_FORWARDED_FOR, chain);

    headers.insert(
        X_REAL_IP,
        HeaderValue::from_str(&client)
            .map_err(|_| ProxyError::InvalidRequest("client address".into()))?,
    );
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    Ok(())
}
