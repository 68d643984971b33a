//! Rate limiting stage - second stage of the admission pipeline.

use actix_web::http::header::{HeaderName, HeaderValue};
use async_trait::async_trait;
use std::sync::Arc;

use modcheck_core::RateLimiter;

use super::admission::{AdmissionContext, AdmissionStage, StageOutcome};
use super::error::AppError;

/// Response header carrying the requests left in the current window.
pub const API_REMAINING: &str = "api-remaining";

pub struct RateLimitStage {
    limiter: Arc<RateLimiter>,
}

impl RateLimitStage {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait]
impl AdmissionStage for RateLimitStage {
    async fn attempt(&self, ctx: &AdmissionContext) -> StageOutcome {
        // The gate normally rejects keyless requests before this stage; if
        // the composition ever changes, an absent key simply rate-limits as
        // its own degenerate partition.
        let caller_key = ctx.api_key.as_deref().unwrap_or_default();

        let admission = match self.limiter.attempt(caller_key).await {
            Ok(admission) => admission,
            Err(e) => {
                tracing::error!(error = %e, "Counter store unavailable during increment");
                return StageOutcome::Terminate(AppError::StoreUnavailable);
            }
        };

        if !admission.admitted {
            tracing::warn!(count = admission.count, "Rate limit exceeded");
            return StageOutcome::Terminate(AppError::RateExceeded);
        }

        // Second store read. Failing here still blocks the request even
        // though the quota unit is already spent - a known accounting quirk,
        // preserved on purpose.
        let remaining = match self.limiter.remaining(caller_key).await {
            Ok(remaining) => remaining,
            Err(e) => {
                tracing::error!(error = %e, "Counter store unavailable reading remaining quota");
                return StageOutcome::Terminate(AppError::StoreUnavailable);
            }
        };

        match HeaderValue::from_str(&remaining.to_string()) {
            Ok(value) => StageOutcome::Proceed(vec![(HeaderName::from_static(API_REMAINING), value)]),
            Err(_) => StageOutcome::Proceed(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingStore, DownStore, wide_window_limiter};

    fn stage_over(store: Arc<dyn modcheck_core::ports::CounterStore>) -> RateLimitStage {
        RateLimitStage::new(Arc::new(wide_window_limiter(store)))
    }

    fn ctx(api_key: Option<&str>) -> AdmissionContext {
        AdmissionContext {
            api_key: api_key.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_remaining_counts_down_to_zero() {
        let stage = stage_over(Arc::new(CountingStore::new()));

        for expected in ["4", "3", "2", "1", "0"] {
            let StageOutcome::Proceed(headers) = stage.attempt(&ctx(Some("caller"))).await else {
                panic!("expected admission");
            };
            assert_eq!(headers[0].1.to_str().unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_denies_over_the_limit() {
        let stage = stage_over(Arc::new(CountingStore::new()));

        for _ in 0..5 {
            stage.attempt(&ctx(Some("caller"))).await;
        }

        assert!(matches!(
            stage.attempt(&ctx(Some("caller"))).await,
            StageOutcome::Terminate(AppError::RateExceeded)
        ));
    }

    #[tokio::test]
    async fn test_absent_key_is_a_degenerate_partition() {
        let stage = stage_over(Arc::new(CountingStore::new()));

        let StageOutcome::Proceed(headers) = stage.attempt(&ctx(None)).await else {
            panic!("expected admission");
        };
        assert_eq!(headers[0].1.to_str().unwrap(), "4");
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_server_error() {
        let stage = stage_over(Arc::new(DownStore));

        assert!(matches!(
            stage.attempt(&ctx(Some("caller"))).await,
            StageOutcome::Terminate(AppError::StoreUnavailable)
        ));
    }
}
