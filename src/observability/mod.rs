//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the relay stream produce:
//!     → logging.rs (structured log events, per-request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows through every log line via the request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
