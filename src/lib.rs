//! Media gateway.
//!
//! A front-end HTTP server that serves static media files straight from
//! disk and forwards every other request to an application backend, one
//! media root and backend per virtual host.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::Router ──┬──▶ static_files ──▶ disk
//!                     (request id,      (Host header,    │    (traversal check,
//!                      tracing,          static prefix)  │     range, listing, CORS)
//!                      concurrency)                      │
//!                                                        └──▶ proxy::Forwarder ──▶ Backend
//!                                                             (forwarded headers,
//!                                                              streaming, timeouts)
//!
//!     Cross-cutting: config (TOML, validated once), observability (tracing,
//!     per-host access/error logs, Prometheus), lifecycle (startup, signals,
//!     graceful shutdown)
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod proxy;
pub mod routing;
pub mod static_files;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Router, RoutingDecision, VirtualHost};
