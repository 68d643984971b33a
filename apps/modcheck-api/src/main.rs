//! Bank account verification API server.

mod config;
mod handlers;
mod middleware;
mod responses;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use modcheck_core::ports::CounterStore;
use modcheck_core::RateLimiter;
use modcheck_infra::StaticApiKeyRegistry;

use crate::config::AppConfig;
use crate::middleware::admission::AdmissionPipeline;
use crate::middleware::auth::AuthorizationGate;
use crate::middleware::rate_limit::RateLimitStage;
use crate::state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,modcheck_api=debug,modcheck_infra=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .pretty()
        .init();
}

/// Assemble the admission stages in the order requests traverse them:
/// the authorization gate first, then the rate limiter.
fn build_pipeline(config: &AppConfig, store: Arc<dyn CounterStore>) -> Arc<AdmissionPipeline> {
    let gate = match &config.api_keys {
        Some(keys) => {
            let registry = StaticApiKeyRegistry::new(keys.iter().cloned());
            AuthorizationGate::with_registry(Arc::new(registry))
        }
        None => AuthorizationGate::accept_any(),
    };

    let limiter = RateLimiter::new(store, config.rate_limit.clone());

    Arc::new(AdmissionPipeline::new(vec![
        Arc::new(gate),
        Arc::new(RateLimitStage::new(Arc::new(limiter))),
    ]))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    let state = AppState::new(&config);
    let store = state::build_counter_store(&config).map_err(std::io::Error::other)?;
    let pipeline = build_pipeline(&config, store);

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Starting server"
    );

    let host = config.host.clone();
    let port = config.port;

    HttpServer::new(move || {
        let pipeline = pipeline.clone();
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, pipeline))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
