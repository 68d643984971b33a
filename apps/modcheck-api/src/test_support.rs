//! Shared test doubles for the admission pipeline tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use modcheck_core::ports::{CounterStore, CounterStoreError};
use modcheck_core::{RateLimitConfig, RateLimiter};
use modcheck_infra::InMemoryCounterStore;

/// In-memory store that counts how many operations reached it.
pub struct CountingStore {
    inner: InMemoryCounterStore,
    operations: AtomicU64,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryCounterStore::new(),
            operations: AtomicU64::new(0),
        }
    }

    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for CountingStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, CounterStoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.inner.increment(key, ttl).await
    }

    async fn current(&self, key: &str) -> Result<u64, CounterStoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.inner.current(key).await
    }
}

/// Store whose backend is unreachable.
pub struct DownStore;

#[async_trait]
impl CounterStore for DownStore {
    async fn increment(&self, _key: &str, _ttl: Duration) -> Result<u64, CounterStoreError> {
        Err(CounterStoreError::Connection("connection refused".into()))
    }

    async fn current(&self, _key: &str) -> Result<u64, CounterStoreError> {
        Err(CounterStoreError::Connection("connection refused".into()))
    }
}

/// Limiter with a window wide enough that a test run never straddles a
/// bucket boundary.
pub fn wide_window_limiter(store: Arc<dyn CounterStore>) -> RateLimiter {
    RateLimiter::new(
        store,
        RateLimitConfig {
            max_requests: 5,
            window: Duration::from_secs(3600),
            key_prefix: "test".to_string(),
        },
    )
}
