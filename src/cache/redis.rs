//! Redis-backed key/value store.

use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;

use super::CacheError;

/// Shared Redis connection. `ConnectionManager` multiplexes and reconnects,
/// so the handle is cheap to clone per request.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = ::redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// `GET key`. `Ok(None)` when the key is absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// `SET key value EX ttl_secs`.
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }
}
