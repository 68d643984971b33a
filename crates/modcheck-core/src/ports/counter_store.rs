use async_trait::async_trait;
use std::time::Duration;

/// Counter store trait - abstraction over the shared quota ledger
/// (Redis, in-memory).
///
/// All cross-request coordination is delegated to the store's atomicity
/// guarantee; callers never read-modify-write a counter themselves.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment a counter and return the new value.
    ///
    /// An absent key is initialized to zero before the increment (the result
    /// is 1) and given an expiry of `ttl` so stale buckets are reclaimed
    /// by the store.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, CounterStoreError>;

    /// Read the current value of a counter. An absent key reads as 0 - that
    /// is a normal first-window case, not an error.
    async fn current(&self, key: &str) -> Result<u64, CounterStoreError>;
}

/// Counter store operation errors. Connectivity failures are distinguishable
/// from "key not found", which is never an error.
#[derive(Debug, thiserror::Error)]
pub enum CounterStoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
