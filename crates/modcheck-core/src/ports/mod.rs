//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod api_keys;
mod counter_store;
mod resolver;

pub use api_keys::ApiKeyRegistry;
pub use counter_store::{CounterStore, CounterStoreError};
pub use resolver::AccountResolver;
