//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs::validate_config (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via AppState with all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route-to-backend mapping is static
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_config, ConfigError};
pub use schema::{
    AdmissionConfig, BackendsConfig, CacheConfig, GatewayConfig, ListenerConfig,
    ObservabilityConfig, TimeoutConfig,
};
