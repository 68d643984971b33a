//! Authorization gate - first stage of the admission pipeline.
//!
//! Verifies a caller credential is present (and recognized, when a registry
//! is configured) before any other processing. No side effects beyond
//! reading the header.

use async_trait::async_trait;
use std::sync::Arc;

use modcheck_core::ports::ApiKeyRegistry;

use super::admission::{AdmissionContext, AdmissionStage, StageOutcome};
use super::error::AppError;

pub struct AuthorizationGate {
    registry: Option<Arc<dyn ApiKeyRegistry>>,
}

impl AuthorizationGate {
    /// Accept any non-empty key.
    pub fn accept_any() -> Self {
        Self { registry: None }
    }

    /// Accept only keys the registry recognizes.
    pub fn with_registry(registry: Arc<dyn ApiKeyRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }
}

#[async_trait]
impl AdmissionStage for AuthorizationGate {
    async fn attempt(&self, ctx: &AdmissionContext) -> StageOutcome {
        let Some(api_key) = ctx.api_key.as_deref().filter(|key| !key.is_empty()) else {
            return StageOutcome::Terminate(AppError::AuthorizationRequired);
        };

        if let Some(registry) = &self.registry {
            if !registry.exists(api_key).await {
                // Same response as a missing key, so callers cannot probe
                // which credentials exist.
                return StageOutcome::Terminate(AppError::AuthorizationRequired);
            }
        }

        StageOutcome::Proceed(Vec::new())
    }
}
