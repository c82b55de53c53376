// backend/src/backend/mod.rs

mod memory;
mod redis_store;

pub use memory::MemoryBackend;
pub use redis_store::{init_redis_pool, RedisBackend};

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::BackendError,
    models::{AnnotationRequest, AnnotationResult, JobId, JobPayload, JobRecord, Progress},
};

#[async_trait]
pub trait JobBackend: Send + Sync {
    async fn submit(&self, request: AnnotationRequest) -> Result<JobId, BackendError>;

    async fn query(&self, id: &JobId) -> Result<Option<JobRecord>, BackendError>;

    // --- Worker side ---

    // Waits up to `timeout` for the next queued job.
    async fn next_job(&self, timeout: Duration) -> Result<Option<JobPayload>, BackendError>;

    async fn report_progress(
        &self,
        job: &JobPayload,
        worker_id: &str,
        progress: Progress,
    ) -> Result<(), BackendError>;

    async fn complete(&self, job: &JobPayload, result: AnnotationResult) -> Result<(), BackendError>;

    async fn fail(&self, job: &JobPayload, error: String) -> Result<(), BackendError>;
}
