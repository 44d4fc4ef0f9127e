//! Cache configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Cache configuration (Redis-backed in production)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Redis connection URL; empty selects the in-memory cache
    #[serde(default)]
    pub redis_url: String,

    /// Time-to-live for cached entries in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Returns true when a Redis URL is configured
    pub fn uses_redis(&self) -> bool {
        !self.redis_url.is_empty()
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.uses_redis()
            && !self.redis_url.starts_with("redis://")
            && !self.redis_url.starts_with("rediss://")
        {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: String::new(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}
