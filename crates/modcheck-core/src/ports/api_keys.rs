use async_trait::async_trait;

/// API key registry trait - decides whether a presented key is recognized.
/// This is where in real life a database call would be done.
#[async_trait]
pub trait ApiKeyRegistry: Send + Sync {
    async fn exists(&self, api_key: &str) -> bool;
}
