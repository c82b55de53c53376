// backend/src/backend/redis_store.rs

use async_trait::async_trait;
use deadpool_redis::{
    redis::{self, AsyncCommands},
    Config, Connection, Pool, Runtime,
};
use std::time::Duration;
use tracing::{debug, error, info};

use super::JobBackend;
use crate::{
    error::BackendError,
    models::{AnnotationRequest, AnnotationResult, JobId, JobPayload, JobRecord, Progress},
};

pub fn init_redis_pool(redis_url: &str) -> Result<Pool, deadpool_redis::CreatePoolError> {
    info!("Attempting to connect to Redis...");
    let cfg = Config::from_url(redis_url);
    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    info!("Successfully created Redis connection pool!");
    // Note: Connection check happens on first use
    Ok(pool)
}

// Redis list as the work queue, one JSON key per job as the result store.
// Keys expire after `result_ttl`; an expired job reads as PENDING again.
pub struct RedisBackend {
    pool: Pool,
    queue_name: String,
    result_ttl: Duration,
}

impl RedisBackend {
    pub fn new(pool: Pool, queue_name: impl Into<String>, result_ttl: Duration) -> Self {
        Self {
            pool,
            queue_name: queue_name.into(),
            result_ttl,
        }
    }

    fn record_key(id: &JobId) -> String {
        format!("nlp:job:{}", id)
    }

    async fn connection(&self) -> Result<Connection, BackendError> {
        Ok(self.pool.get().await?)
    }

    async fn load(&self, con: &mut Connection, id: &JobId) -> Result<Option<JobRecord>, BackendError> {
        let raw: Option<String> = con.get(Self::record_key(id)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(BackendError::from)
    }

    async fn store(&self, con: &mut Connection, record: &JobRecord) -> Result<(), BackendError> {
        let json = serde_json::to_string(record)?;
        let _: () = con
            .set_ex(Self::record_key(&record.id), json, self.result_ttl.as_secs())
            .await?;
        Ok(())
    }

    // Read-modify-write of one record. Only the worker that dequeued a job
    // writes to it, so there is no competing writer.
    async fn update<F>(&self, job: &JobPayload, apply: F) -> Result<(), BackendError>
    where
        F: FnOnce(&mut JobRecord) -> bool + Send,
    {
        let mut con = self.connection().await?;
        let mut record = self
            .load(&mut con, &job.id)
            .await?
            .unwrap_or_else(|| JobRecord::pending(job));
        if apply(&mut record) {
            self.store(&mut con, &record).await
        } else {
            debug!("Ignored stale update for job {} in state {}", job.id, record.state.as_str());
            Ok(())
        }
    }
}

#[async_trait]
impl JobBackend for RedisBackend {
    async fn submit(&self, request: AnnotationRequest) -> Result<JobId, BackendError> {
        let payload = JobPayload::new(JobId::generate(), request);
        let record = serde_json::to_string(&JobRecord::pending(&payload))?;
        let message = serde_json::to_string(&payload)?;

        let mut con = self.connection().await?;
        let _: () = redis::pipe()
            .atomic()
            .set_ex(Self::record_key(&payload.id), record, self.result_ttl.as_secs())
            .ignore()
            .rpush(&self.queue_name, message)
            .ignore()
            .query_async(&mut con)
            .await?;

        Ok(payload.id)
    }

    async fn query(&self, id: &JobId) -> Result<Option<JobRecord>, BackendError> {
        let mut con = self.connection().await?;
        self.load(&mut con, id).await
    }

    async fn next_job(&self, timeout: Duration) -> Result<Option<JobPayload>, BackendError> {
        let mut con = self.connection().await?;
        let popped: Option<(String, String)> = con
            .blpop(&self.queue_name, timeout.as_secs_f64())
            .await?;

        match popped {
            Some((_, message)) => match serde_json::from_str::<JobPayload>(&message) {
                Ok(job) => Ok(Some(job)),
                Err(e) => {
                    error!("Invalid job payload in queue: {}. Skipping.", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn report_progress(
        &self,
        job: &JobPayload,
        worker_id: &str,
        progress: Progress,
    ) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_progress(worker_id, progress))
            .await
    }

    async fn complete(&self, job: &JobPayload, result: AnnotationResult) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_success(result)).await
    }

    async fn fail(&self, job: &JobPayload, error: String) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_failure(error)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_are_namespaced() {
        let id = JobId::from("0d9a2c1e".to_string());
        assert_eq!(RedisBackend::record_key(&id), "nlp:job:0d9a2c1e");
    }

    #[tokio::test]
    async fn unreachable_redis_is_an_error_not_pending() {
        // Nothing listens on port 1.
        let pool = init_redis_pool("redis://127.0.0.1:1").unwrap();
        let backend = RedisBackend::new(pool, "test_queue", Duration::from_secs(60));
        let result = backend.query(&JobId::generate()).await;
        assert!(result.is_err());
    }
}
