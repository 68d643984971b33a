//! Application state - shared across all handlers.

use std::sync::Arc;

use modcheck_core::ports::{AccountResolver, CounterStore, CounterStoreError};
use modcheck_infra::{InMemoryCounterStore, ModulusResolver, RedisCounterStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn AccountResolver>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let resolver: Arc<dyn AccountResolver> = match &config.weights_file {
            Some(path) => match ModulusResolver::from_file(path) {
                Ok(resolver) => {
                    tracing::info!(path = %path, "Loaded modulus weight table");
                    Arc::new(resolver)
                }
                Err(e) => {
                    tracing::error!(
                        path = %path,
                        error = %e,
                        "Failed to load weight table. Using the bundled excerpt."
                    );
                    Arc::new(ModulusResolver::from_embedded())
                }
            },
            None => Arc::new(ModulusResolver::from_embedded()),
        };

        Self { resolver }
    }
}

/// Build the counter store named by the configuration.
///
/// An unreachable Redis is not an error here: connections are established
/// lazily and requests fail closed until the store comes back. Only a
/// malformed URL aborts startup.
pub fn build_counter_store(config: &AppConfig) -> Result<Arc<dyn CounterStore>, CounterStoreError> {
    match &config.redis {
        Some(redis_config) => {
            let store = RedisCounterStore::new(redis_config.clone())?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "REDIS_URL not set. Using in-memory counters (not shared across instances)."
            );
            Ok(Arc::new(InMemoryCounterStore::new()))
        }
    }
}
