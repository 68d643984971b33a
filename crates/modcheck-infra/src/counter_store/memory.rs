//! In-memory counter store - used for local development and tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use modcheck_core::ports::{CounterStore, CounterStoreError};

struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

/// In-memory counter store using a HashMap with an async RwLock.
///
/// Counts are per-process, not shared across instances, and are lost on
/// restart. Production deployments use [`super::RedisCounterStore`].
pub struct InMemoryCounterStore {
    counters: RwLock<HashMap<String, CounterEntry>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(entry: &CounterEntry) -> bool {
        Instant::now() > entry.expires_at
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, CounterStoreError> {
        let mut counters = self.counters.write().await;

        match counters.get_mut(key) {
            Some(entry) if !Self::is_expired(entry) => {
                entry.count += 1;
                Ok(entry.count)
            }
            _ => {
                // Absent or expired: same as the store reclaiming the bucket.
                counters.insert(
                    key.to_string(),
                    CounterEntry {
                        count: 1,
                        expires_at: Instant::now() + ttl,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn current(&self, key: &str) -> Result<u64, CounterStoreError> {
        let counters = self.counters.read().await;

        match counters.get(key) {
            Some(entry) if !Self::is_expired(entry) => Ok(entry.count),
            _ => Ok(0),
        }
    }
}
