//! In-process key/value store with per-entry expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A thread-safe in-process store. Entries expire lazily on read.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Entry>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        // Sweep an expired entry first so the read below never holds a shard
        // lock across a removal.
        self.inner.remove_if(key, |_, entry| entry.expires_at <= now);
        self.inner.get(key).map(|entry| entry.value.clone())
    }

    pub fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) {
        self.inner.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
    }

    /// Number of live (possibly expired-but-unswept) entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
