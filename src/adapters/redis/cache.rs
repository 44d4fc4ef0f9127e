//! Redis-backed cache implementation for production deployments.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::Cache;

/// Redis cache for multi-server deployments.
///
/// Values are stored with `SET key value EX ttl`; invalidation is `DEL`.
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Creates a cache over an established Redis connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

fn cache_error(err: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", err))
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(cache_error)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.set_ex(key, value, ttl_secs)
            .await
            .map_err(cache_error)
    }

    async fn invalidate(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: u64 = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }
}
