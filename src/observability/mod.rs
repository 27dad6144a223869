//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and dispatcher produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a dispatch
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
