//! Redis profile cache

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;

use super::{ProfileCache, StoreError};

/// Profile cache on a shared Redis connection
#[derive(Clone)]
pub struct RedisProfileCache {
    conn: ConnectionManager,
}

impl RedisProfileCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect and return a cache using a managed (auto-reconnecting) connection
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl ProfileCache for RedisProfileCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        // Redis rejects EX 0
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut conn)
            .await?;

        tracing::debug!(key = %key, ttl_secs = seconds, "Cached profile");
        Ok(())
    }
}
