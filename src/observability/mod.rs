//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers produce:
//!     → access_log.rs (per-vhost access and error streams)
//!     → metrics.rs (counters, histograms)
//!     → logging.rs (tracing subscriber for everything else)
//!
//! Consumers:
//!     → Log files / stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Access and error records are separate streams per virtual host
//! - Request ID flows through logs and to the backend
//! - Metrics are cheap (atomic increments)

pub mod access_log;
pub mod logging;
pub mod metrics;

pub use access_log::{AccessRecord, ErrorRecord, RouteKind, VhostLogs};
