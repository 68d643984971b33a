//! Redis counter store - atomic increment with expiry via a Lua script.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use tokio::sync::OnceCell;

use modcheck_core::ports::{CounterStore, CounterStoreError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Redis-backed counter store.
///
/// The connection manager is established lazily on first use: a server that
/// starts while Redis is down comes up normally and every quota check fails
/// closed until the store is reachable again. Once established, the manager
/// reconnects on its own after transient failures.
pub struct RedisCounterStore {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    config: RedisConfig,
    /// Lua script for atomic increment with TTL on first touch.
    script: Script,
}

impl RedisCounterStore {
    pub fn new(config: RedisConfig) -> Result<Self, CounterStoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| CounterStoreError::Connection(e.to_string()))?;

        let script = Script::new(
            r#"
            local current = redis.call('INCR', KEYS[1])
            if current == 1 then
                redis.call('EXPIRE', KEYS[1], ARGV[1])
            end
            return current
            "#,
        );

        Ok(Self {
            client,
            conn: OnceCell::new(),
            config,
            script,
        })
    }

    /// Create from environment configuration.
    pub fn from_env() -> Result<Self, CounterStoreError> {
        Self::new(RedisConfig::from_env())
    }

    async fn manager(&self) -> Result<ConnectionManager, CounterStoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                // Use timeout to prevent hanging if Redis is unreachable
                let conn_manager_fut = ConnectionManager::new(self.client.clone());
                let conn = tokio::time::timeout(self.config.connect_timeout, conn_manager_fut)
                    .await
                    .map_err(|_| {
                        CounterStoreError::Connection("Connection timed out".to_string())
                    })?
                    .map_err(|e| CounterStoreError::Connection(e.to_string()))?;

                tracing::info!(url = %self.config.url, "Connected to Redis counter store");
                Ok::<_, CounterStoreError>(conn)
            })
            .await?;

        Ok(conn.clone())
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, CounterStoreError> {
        let mut conn = self.manager().await?;

        let count: i64 = self
            .script
            .key(key)
            .arg(ttl.as_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CounterStoreError::Backend(e.to_string()))?;

        Ok(count.max(0) as u64)
    }

    async fn current(&self, key: &str) -> Result<u64, CounterStoreError> {
        let mut conn = self.manager().await?;

        // GET on a missing key is Nil, a normal first-window case.
        let count: Option<i64> = conn
            .get(key)
            .await
            .map_err(|e| CounterStoreError::Backend(e.to_string()))?;

        Ok(count.unwrap_or(0).max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_store() -> Option<RedisCounterStore> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
        };

        let store = RedisCounterStore::new(config).ok()?;
        // Probe once so tests skip cleanly when Redis is not running.
        store.manager().await.ok()?;
        Some(store)
    }

    #[tokio::test]
    async fn test_redis_increment_and_current() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => return,
        };

        let key = format!(
            "test_counter:{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );

        assert_eq!(
            store.increment(&key, Duration::from_secs(2)).await.unwrap(),
            1
        );
        assert_eq!(
            store.increment(&key, Duration::from_secs(2)).await.unwrap(),
            2
        );
        assert_eq!(store.current(&key).await.unwrap(), 2);

        // Bucket reclaimed by the store once the TTL elapses.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(store.current(&key).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_closed() {
        let store = RedisCounterStore::new(RedisConfig {
            url: "redis://localhost:1".to_string(),
            connect_timeout: Duration::from_millis(200),
        })
        .unwrap();

        assert!(
            store
                .increment("key", Duration::from_secs(60))
                .await
                .is_err()
        );
        assert!(store.current("key").await.is_err());
    }
}
