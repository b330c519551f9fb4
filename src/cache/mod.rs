//! Cache-aside layer over an external key/value store.
//!
//! # Design Decisions
//! - Enum dispatch over store backends, no vtable
//! - Graceful degradation: an unreachable Redis at startup falls back to the
//!   in-process store instead of blocking the gateway
//! - Lookup failures are surfaced to the caller, which logs and proceeds as
//!   a miss; store failures are best-effort because the response has already
//!   been computed
//! - Keys are the request's full path+query; values are the serialized JSON
//!   body that was (or would have been) sent
//! - Caching is opted into per endpoint and never applies to forwarded
//!   traffic, which may be non-idempotent

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use crate::config::CacheConfig;

/// Error from the underlying key/value store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// A handle to the configured cache backend.
#[derive(Clone)]
pub enum CacheStore {
    /// Caching disabled; every lookup is a miss and stores are dropped.
    Disabled,
    /// In-process store, used when no Redis URL is configured and in tests.
    Memory(MemoryStore),
    /// Shared Redis store (`GET key` / `SET key value EX ttl`).
    Redis(RedisStore),
}

impl CacheStore {
    /// Build a store from configuration.
    ///
    /// A Redis URL that cannot be connected to degrades to the in-process
    /// store with a warning; cache availability must not block startup.
    pub async fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::Disabled;
        }
        match &config.redis_url {
            Some(url) => match RedisStore::connect(url).await {
                Ok(store) => {
                    tracing::info!(url = %url, "Connected to Redis cache");
                    Self::Redis(store)
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Redis unavailable, using in-process cache");
                    Self::Memory(MemoryStore::new())
                }
            },
            None => Self::Memory(MemoryStore::new()),
        }
    }

    /// Look up a cached body by key.
    ///
    /// `Ok(None)` is a miss. Store-level failures are returned so the caller
    /// can log them; the caller then proceeds exactly as on a miss.
    pub async fn lookup(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            Self::Disabled => Ok(None),
            Self::Memory(store) => Ok(store.get(key)),
            Self::Redis(store) => store.get(key).await,
        }
    }

    /// Write a body under a key with an expiry.
    pub async fn store(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Memory(store) => {
                store.set_ex(key, value, ttl_secs);
                Ok(())
            }
            Self::Redis(store) => store.set_ex(key, value, ttl_secs).await,
        }
    }
}
