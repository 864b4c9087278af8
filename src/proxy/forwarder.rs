//! Forwarding requests to a virtual host's backend.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{uri::Authority, uri::Scheme, Request, Uri, Version},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{ProxyClientConfig, TimeoutConfig};
use crate::error::ProxyError;
use crate::proxy::headers;
use crate::routing::VirtualHost;

/// HTTP/1.1 client for backends on the loopback network.
///
/// Never retries: a failed request is reported to the client as-is, since
/// the gateway cannot know whether the backend already acted on it.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    response_timeout: Duration,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig, client_config: &ProxyClientConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(client_config.pool_idle_per_host)
            .build(connector);

        Self {
            client,
            response_timeout: Duration::from_secs(timeouts.backend_secs),
        }
    }

    /// Relay `request` to the host's backend and hand back its response
    /// unchanged.
    ///
    /// `original_host` is the host the client addressed; `client` is the
    /// socket address of the inbound connection.
    pub async fn forward(
        &self,
        vhost: &VirtualHost,
        original_host: &str,
        client: SocketAddr,
        request: Request<Body>,
    ) -> Result<Response, ProxyError> {
        let backend = vhost.backend_address();
        let (mut parts, body) = request.into_parts();

        headers::strip_hop_by_hop(&mut parts.headers);
        headers::apply_forwarding(&mut parts.headers, original_host, client.ip())?;
        parts.uri = backend_uri(backend, &parts.uri)?;
        parts.version = Version::HTTP_11;

        tracing::debug!(backend = %backend, uri = %parts.uri, "Forwarding request");

        let pending = self.client.request(Request::from_parts(parts, body));
        match tokio::time::timeout(self.response_timeout, pending).await {
            Ok(Ok(response)) => Ok(relay(response)),
            Ok(Err(e)) if e.is_connect() => Err(ProxyError::BackendUnreachable {
                address: backend.to_string(),
                reason: error_chain(&e),
            }),
            Ok(Err(e)) => Err(ProxyError::Upstream {
                address: backend.to_string(),
                reason: error_chain(&e),
            }),
            Err(_) => Err(ProxyError::BackendTimeout {
                address: backend.to_string(),
                after: self.response_timeout,
            }),
        }
    }
}

/// Hand the backend response to axum unchanged; the body keeps streaming
/// from the backend connection.
fn relay(response: hyper::Response<Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body))
}

/// Point `original` (path and query kept) at `backend`.
pub fn backend_uri(backend: SocketAddr, original: &Uri) -> Result<Uri, ProxyError> {
    let mut parts = original.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(
        Authority::try_from(backend.to_string().as_str())
            .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?,
    );
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some("/".parse().map_err(|_| {
            ProxyError::InvalidRequest("empty path".into())
        })?);
    }
    Uri::from_parts(parts).map_err(|e| ProxyError::InvalidRequest(e.to_string()))
}

/// `hyper_util`'s errors keep the useful part (e.g. "connection refused")
/// in their sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
