//! Static API key registry.

use std::collections::HashSet;

use async_trait::async_trait;

use modcheck_core::ports::ApiKeyRegistry;

/// Registry backed by a fixed set of keys loaded at startup.
///
/// Lookup deliberately reveals nothing about which keys exist: callers with
/// an unrecognized key get the same response as callers with no key at all.
pub struct StaticApiKeyRegistry {
    keys: HashSet<String>,
}

impl StaticApiKeyRegistry {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ApiKeyRegistry for StaticApiKeyRegistry {
    async fn exists(&self, api_key: &str) -> bool {
        self.keys.contains(api_key)
    }
}
