//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the gateway handler as fallback
//! - Wire up middleware (request ID, tracing, concurrency limit)
//! - Bind server to listener
//! - Dispatch requests: static media or backend
//! - Access/error logs and metrics for every routed request

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::request::{request_host, request_id, request_target};
use crate::http::response::sent_length;
use crate::observability::{metrics, AccessRecord, ErrorRecord, RouteKind};
use crate::proxy::Forwarder;
use crate::routing::{Router as HostRouter, RoutingDecision};
use crate::static_files;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HostRouter>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    /// Build the virtual host table and the HTTP stack.
    ///
    /// Fails if any virtual host cannot be built (media root, log files).
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let router = Arc::new(HostRouter::from_config(&config)?);
        let forwarder = Forwarder::new(&config.timeouts, &config.proxy);

        tracing::info!(virtual_hosts = router.len(), "Virtual hosts loaded");

        let state = AppState { router, forwarder };
        let app = Self::build_app(&config, state);
        Ok(Self { app })
    }

    /// Build the Axum router with all middleware layers.
    fn build_app(config: &GatewayConfig, state: AppState) -> Router {
        let permits = config
            .listener
            .max_concurrent_requests
            .min(Semaphore::MAX_PERMITS);
        let in_flight = Arc::new(Semaphore::new(permits));

        Router::new()
            .fallback(gateway_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(in_flight, concurrency_limit))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving requests without a socket.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Hold a permit while the request is being handled; waits when the limit
/// is reached.
async fn concurrency_limit(
    State(in_flight): State<Arc<Semaphore>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Ok(_permit) = in_flight.acquire_owned().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    next.run(request).await
}

/// Main gateway handler.
/// Routes by host and path, then serves from disk or forwards to the backend.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let verb = request.method().clone();
    let method = verb.to_string();
    let target = request_target(&request);
    let rid = request_id(&request).to_string();
    let host = request_host(&request);

    let decision = match state.router.route(host.as_deref(), request.uri().path()) {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!(
                request_id = %rid,
                client = %client,
                host = ?host,
                error = %e,
                "No virtual host matched"
            );
            metrics::record_request("-", None, e.status().as_u16(), start);
            return e.into_response();
        }
    };

    let vhost = Arc::clone(decision.vhost());
    let (route, outcome) = match decision {
        RoutingDecision::StaticServe {
            vhost,
            relative_path,
        } => {
            let (parts, _body) = request.into_parts();
            let outcome = static_files::serve_static(&vhost, &relative_path, &parts)
                .await
                .map_err(|e| (e.to_string(), e.into_response()));
            (RouteKind::Static, outcome)
        }
        RoutingDecision::Proxy { vhost } => {
            let original_host = host.unwrap_or_default();
            let outcome = state
                .forwarder
                .forward(&vhost, &original_host, client, request)
                .await
                .map_err(|e| (e.to_string(), e.into_response()));
            (RouteKind::Proxy, outcome)
        }
    };

    let response = match outcome {
        Ok(response) => response,
        Err((message, response)) => {
            vhost.logs().error(&ErrorRecord {
                client: client.ip(),
                method: &method,
                path: &target,
                status: response.status().as_u16(),
                message: &message,
            });
            response
        }
    };

    let status = response.status().as_u16();
    vhost.logs().access(&AccessRecord {
        client: client.ip(),
        method: &method,
        path: &target,
        status,
        bytes: sent_length(&verb, &response),
        latency: start.elapsed(),
        route,
        request_id: &rid,
    });
    metrics::record_request(vhost.hostname(), Some(route), status, start);

    response
}
