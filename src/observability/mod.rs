//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, request id attached by middleware)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log output (stdout, filtered by RUST_LOG)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod metrics;
