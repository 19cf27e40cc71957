//! Redis cache backend
//!
//! Shares entries across every instance pointed at the same Redis. Unlike a
//! read-through cache, lookup failures are returned to the caller instead of
//! being reported as misses.

use std::time::Duration;

use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::{CacheError, CacheStore};

#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a connection pool for `url`. No connection is opened until the
    /// first command.
    pub fn from_url(url: &str) -> Result<Self, CacheError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Configuration(format!("invalid Redis pool: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Check that a connection can be acquired
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.pool.get().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to get Redis connection");
            CacheError::from(e)
        })?;

        let value: Option<String> = conn.get(key).await.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Redis GET error");
            CacheError::from(e)
        })?;

        tracing::debug!(key = %key, hit = value.is_some(), "cache get (redis)");
        Ok(value)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to get Redis connection");
            CacheError::from(e)
        })?;

        // SET EX takes whole seconds and rejects zero
        let ttl_secs = match ttl.as_secs() {
            0 if !ttl.is_zero() => 1,
            secs => secs,
        };
        let result = if ttl_secs == 0 {
            conn.set::<_, _, ()>(key, value).await
        } else {
            conn.set_ex::<_, _, ()>(key, value, ttl_secs).await
        };

        result.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Redis SET error");
            CacheError::from(e)
        })?;

        tracing::debug!(key = %key, ttl_secs = %ttl_secs, "cache set (redis)");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(key).await.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Redis DEL error");
            CacheError::from(e)
        })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
