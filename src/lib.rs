//! API gateway in front of the sports-data and recipes services.
//!
//! Unifies two independent backends behind one HTTP surface: generic
//! prefix-based forwarding, composite endpoints that merge results from both
//! services, bounded-concurrency admission control, and a short-lived
//! response cache. Every downstream failure is normalized into a uniform
//! `{message, error}` envelope.

pub mod admission;
pub mod aggregate;
pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::{GatewayError, HttpServer};
pub use lifecycle::Shutdown;
