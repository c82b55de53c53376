// backend/src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod job_worker;
pub mod jobs;
pub mod models;
pub mod validation;

const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

use backend::JobBackend;
use jobs::{JobSubmitter, JobTracker};
use validation::ParamValidator;

// Application State shared across all handlers
pub struct AppState {
    pub validator: ParamValidator,
    pub submitter: JobSubmitter,
    pub tracker: JobTracker,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(validator: ParamValidator, backend: Arc<dyn JobBackend>) -> Self {
        Self {
            validator,
            submitter: JobSubmitter::new(Arc::clone(&backend)),
            tracker: JobTracker::new(backend),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(app_state.max_body_bytes);

    Router::new()
        .route("/", get(api::health_check))
        .route("/annotate/:operation", post(api::annotate))
        .route("/get-entities/", post(api::get_all_entities))
        .route("/get-entities/:entity_type", post(api::get_entities))
        .route("/status/:task_id", get(api::task_status))
        .route("/help/", get(api::list_all_options))
        .route("/help/:topic", get(api::list_options))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
