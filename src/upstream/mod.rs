//! Downstream backend access.
//!
//! # Data Flow
//! ```text
//! Inbound /nba/* or /recipes/*
//!     → forward.rs (prefix strip, URI rewrite, verbatim relay)
//!
//! Aggregation endpoints
//!     → backend.rs (typed JSON GETs with timeout + error classification)
//! ```

pub mod backend;
pub mod forward;

pub use backend::Backend;
pub use forward::{forward_to_recipes, forward_to_sports};
