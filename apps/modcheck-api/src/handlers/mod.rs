//! HTTP handlers and route configuration.

mod health;
mod verify;

use actix_web::web;
use std::sync::Arc;

use crate::middleware::admission::{AdmissionMiddleware, AdmissionPipeline};

/// Configure all application routes. The verification endpoint sits behind
/// the admission pipeline; the health endpoint does not.
pub fn configure_routes(cfg: &mut web::ServiceConfig, pipeline: Arc<AdmissionPipeline>) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/verify")
                .wrap(AdmissionMiddleware::new(pipeline))
                .route(web::post().to(verify::verify)),
        );
}
