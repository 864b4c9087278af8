//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → matcher.rs (normalize host, match static prefixes)
//!     → router.rs (virtual host lookup)
//!     → Return: StaticServe(vhost, relative path) | Proxy(vhost) | NoMatchingHost
//!
//! Host Table Compilation (at startup):
//!     VirtualHostConfig[]
//!     → vhost.rs (canonical root, sorted prefixes, log files)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Host table built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Longest static prefix wins; everything else is the application route

pub mod matcher;
pub mod router;
pub mod vhost;

pub use router::{Router, RoutingDecision};
pub use vhost::VirtualHost;
