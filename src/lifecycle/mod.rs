//! Lifecycle management subsystem.
//!
//! Startup is ordered in `main`: config first, then stores and clients, then
//! the listener. Shutdown drains in-flight requests via axum's graceful
//! shutdown, driven by the broadcast coordinator in `shutdown.rs`.

pub mod shutdown;

pub use shutdown::Shutdown;
