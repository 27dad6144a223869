//! HTTP API gateway.
//!
//! Forwards `/api/products`, `/api/newsletter` and `/api/search` traffic to
//! their upstream services and serves a few informational endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http::server ──▶ routing ──▶ dispatcher ──▶ Upstream
//!              (CORS, req id,   (prefix     (forward +
//!               trace, logs)     table)      relay)
//!   Client ◀──────────────────────────────── dispatcher ◀── Upstream
//!
//!   Cross-cutting: config, observability, lifecycle, error
//! ```

// Core subsystems
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use dispatcher::Dispatcher;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
