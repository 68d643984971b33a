//! Fixed-window rate limiting backed by a shared counter store.
//!
//! The limiter holds no persistent state of its own: every decision is one
//! atomic increment against the store, keyed by caller and time window.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::ports::{CounterStore, CounterStoreError};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per caller per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Key prefix for counter keys.
    pub key_prefix: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

/// Outcome of a single admission attempt. Produced fresh per request,
/// never persisted.
#[derive(Debug, Clone)]
pub struct Admission {
    pub admitted: bool,
    /// The counter value after this attempt's increment.
    pub count: u64,
}

/// Per-caller fixed-window rate limiter.
///
/// A single instance is shared across concurrent requests; the injected
/// store client is the only shared mutable state.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    /// Spend one quota unit for `caller_key` in the current window.
    ///
    /// One store attempt only: an error is returned as-is, never retried and
    /// never treated as "quota exceeded".
    pub async fn attempt(&self, caller_key: &str) -> Result<Admission, CounterStoreError> {
        let key = self.bucket_key(caller_key);
        let count = self.store.increment(&key, self.config.window).await?;

        Ok(Admission {
            admitted: count <= u64::from(self.config.max_requests),
            count,
        })
    }

    /// Requests left for `caller_key` in the current window, clamped at 0.
    ///
    /// This is a second store read: called after a successful `attempt`, it
    /// reflects the count including that increment. A store error here is as
    /// fatal as one during the increment, even though the quota unit has
    /// already been spent.
    pub async fn remaining(&self, caller_key: &str) -> Result<u64, CounterStoreError> {
        let key = self.bucket_key(caller_key);
        let count = self.store.current(&key).await?;

        Ok(u64::from(self.config.max_requests).saturating_sub(count))
    }

    /// Composite counter key: `{prefix}:{caller}:{window_index}`.
    ///
    /// An empty caller key is a normal, if degenerate, partition - the
    /// authorization gate normally rejects those requests before they
    /// reach the limiter.
    fn bucket_key(&self, caller_key: &str) -> String {
        format!(
            "{}:{}:{}",
            self.config.key_prefix,
            caller_key,
            window_index(unix_now_secs(), self.config.window.as_secs())
        )
    }
}

/// Window id via wall-clock floor division.
///
/// Two requests a moment apart can land in adjacent windows right at a
/// boundary; accepted behavior.
fn window_index(now_secs: u64, window_secs: u64) -> u64 {
    now_secs / window_secs.max(1)
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
