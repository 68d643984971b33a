//! Admission pipeline - an ordered, short-circuiting chain of stages run
//! ahead of the verification handler.
//!
//! Stages implement a common `attempt(ctx) -> Proceed | Terminate` capability
//! and the driver iterates the list, stopping at the first termination. This
//! keeps short-circuit semantics without nested continuation callbacks; one
//! actix middleware adapts the whole pipeline onto the wrapped handler.

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{Error, ResponseError};
use async_trait::async_trait;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use super::error::AppError;

/// What a stage is allowed to see of a request.
#[derive(Debug, Clone)]
pub struct AdmissionContext {
    /// The caller credential, straight from the Api-Key header.
    pub api_key: Option<String>,
}

impl AdmissionContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let api_key = headers
            .get("Api-Key")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Self { api_key }
    }
}

/// Outcome of one stage: continue down the chain, optionally contributing
/// response headers, or terminate with a fixed error.
pub enum StageOutcome {
    Proceed(Vec<(HeaderName, HeaderValue)>),
    Terminate(AppError),
}

/// One admission stage. A stage either lets the request proceed or produces
/// the terminal response; never both.
#[async_trait]
pub trait AdmissionStage: Send + Sync {
    async fn attempt(&self, ctx: &AdmissionContext) -> StageOutcome;
}

/// The ordered stage list. Composition order is fixed at construction time;
/// the driver holds no decision logic of its own.
///
/// A single pipeline instance is shared across concurrent requests - stages
/// keep no per-request state.
pub struct AdmissionPipeline {
    stages: Vec<Arc<dyn AdmissionStage>>,
}

impl AdmissionPipeline {
    pub fn new(stages: Vec<Arc<dyn AdmissionStage>>) -> Self {
        Self { stages }
    }

    /// Run every stage in order, stopping at the first termination. Headers
    /// contributed by earlier stages are dropped when a later stage
    /// terminates - the terminal response is written exactly once, as-is.
    pub async fn run(&self, ctx: &AdmissionContext) -> StageOutcome {
        let mut headers = Vec::new();

        for stage in &self.stages {
            match stage.attempt(ctx).await {
                StageOutcome::Proceed(stage_headers) => headers.extend(stage_headers),
                terminate @ StageOutcome::Terminate(_) => return terminate,
            }
        }

        StageOutcome::Proceed(headers)
    }
}

/// Actix middleware factory driving the pipeline ahead of the wrapped
/// handler.
pub struct AdmissionMiddleware {
    pipeline: Arc<AdmissionPipeline>,
}

impl AdmissionMiddleware {
    pub fn new(pipeline: Arc<AdmissionPipeline>) -> Self {
        Self { pipeline }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdmissionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdmissionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdmissionMiddlewareService {
            service: Rc::new(service),
            pipeline: self.pipeline.clone(),
        }))
    }
}

pub struct AdmissionMiddlewareService<S> {
    service: Rc<S>,
    pipeline: Arc<AdmissionPipeline>,
}

impl<S, B> Service<ServiceRequest> for AdmissionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let pipeline = self.pipeline.clone();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let ctx = AdmissionContext::from_headers(req.headers());

            match pipeline.run(&ctx).await {
                StageOutcome::Terminate(error) => {
                    let response = error.error_response();
                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                StageOutcome::Proceed(headers) => {
                    let res = service.call(req).await?;
                    let mut res = res.map_into_left_body();
                    for (name, value) in headers {
                        res.headers_mut().insert(name, value);
                    }
                    Ok(res)
                }
            }
        })
    }
}
