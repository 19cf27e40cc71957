//! Tessera Cache
//!
//! Key/value storage with per-entry expiration, used as the token denylist:
//! - In-memory backend for single-instance deployments and tests
//! - Redis backend for deployments sharing revocations across instances
//! - An always-failing backend for exercising error paths

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub mod memory;
pub mod mock;
pub mod redis_store;

pub use memory::MemoryCache;
pub use redis_store::RedisCache;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache configuration error: {0}")]
    Configuration(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Build a namespaced cache key of the form `<prefix>:<id>`
pub fn cache_key(prefix: &str, id: &str) -> String {
    format!("{}:{}", prefix, id)
}

/// Cache backend contract.
///
/// `get` distinguishes a confirmed miss (`Ok(None)`) from a failed lookup
/// (`Err`); callers making security decisions must treat the latter as a
/// failure, never as a miss.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    ///
    /// A zero `ttl` stores the entry without expiration.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheError>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Cache backend configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Backend provider (memory, redis)
    pub provider: String,
    /// Redis connection URL, required for the redis provider
    pub redis_url: Option<String>,
}

impl CacheConfig {
    pub fn memory() -> Self {
        Self {
            provider: "memory".to_string(),
            redis_url: None,
        }
    }
}

/// Cache backend factory
pub struct CacheStoreFactory;

impl CacheStoreFactory {
    /// Create a cache backend based on configuration
    pub fn create(config: CacheConfig) -> Result<Arc<dyn CacheStore>, CacheError> {
        match config.provider.as_str() {
            "memory" => {
                tracing::info!("Creating in-memory cache backend");
                Ok(Arc::new(MemoryCache::new()))
            }
            "redis" => {
                let url = config.redis_url.ok_or_else(|| {
                    CacheError::Configuration("redis provider requires a REDIS_URL".to_string())
                })?;
                tracing::info!("Creating Redis cache backend");
                Ok(Arc::new(RedisCache::from_url(&url)?))
            }
            provider => Err(CacheError::Configuration(format!(
                "Unknown cache provider: {}. Supported providers: memory, redis",
                provider
            ))),
        }
    }
}
