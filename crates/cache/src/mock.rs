//! Cache test doubles
//!
//! [`UnavailableCache`] returns [`CacheError::Unavailable`] for every
//! operation, simulating a store outage. [`RecordingCache`] behaves like the
//! in-memory backend and keeps a log of every write with its TTL.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{CacheError, CacheStore, MemoryCache};

#[derive(Debug, Clone, Default)]
pub struct UnavailableCache {
    calls: Arc<AtomicUsize>,
}

impl UnavailableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations attempted against this backend
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> CacheError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CacheError::Unavailable("cache backend is down".to_string())
    }
}

#[async_trait::async_trait]
impl CacheStore for UnavailableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(self.fail())
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(self.fail())
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}

/// A write observed by [`RecordingCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub key: String,
    pub value: String,
    pub ttl: Duration,
}

/// In-memory backend that records every `set_with_ttl` call
#[derive(Debug, Clone, Default)]
pub struct RecordingCache {
    inner: MemoryCache,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes in call order
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedWrite {
                key: key.to_string(),
                value: value.to_string(),
                ttl,
            });
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}
