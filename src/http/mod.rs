//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → request.rs (attach request ID)
//!     → admission gate (reject over-capacity with 503)
//!     → server.rs routes:
//!         /nba/*, /recipes/*        → upstream::forward
//!         /recipe-*, /services-status → aggregate handlers
//!         /status                    → cache-aside liveness
//!     → error.rs (normalize any downstream failure)
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::GatewayError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, RecipePicker};
