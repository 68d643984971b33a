//! # Modcheck Infrastructure
//!
//! Concrete implementations of the ports defined in `modcheck-core`:
//! the Redis counter store, an in-memory counter store for development and
//! tests, the static API key registry, and the modulus-checking resolver.

pub mod api_keys;
pub mod counter_store;
pub mod resolver;

pub use api_keys::StaticApiKeyRegistry;
pub use counter_store::{InMemoryCounterStore, RedisConfig, RedisCounterStore};
pub use resolver::{ModulusResolver, WeightTableError};
