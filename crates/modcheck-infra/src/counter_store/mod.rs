//! Counter store implementations - Redis and in-memory.

mod memory;
mod redis;

pub use memory::InMemoryCounterStore;
pub use redis::{RedisConfig, RedisCounterStore};
