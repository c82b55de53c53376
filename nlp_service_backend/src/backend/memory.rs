// backend/src/backend/memory.rs

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use tokio::{
    sync::{mpsc, Mutex, RwLock},
    time::Instant,
};
use tracing::debug;

use super::JobBackend;
use crate::{
    error::BackendError,
    models::{AnnotationRequest, AnnotationResult, JobId, JobPayload, JobRecord, Progress},
};

const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(86_400);

struct StoredRecord {
    record: JobRecord,
    written_at: Instant,
}

// In-process queue and result store for single-process deployments and tests.
// Like the Redis keys, a record expires `result_ttl` after its last write.
pub struct MemoryBackend {
    records: RwLock<HashMap<JobId, StoredRecord>>,
    sender: mpsc::UnboundedSender<JobPayload>,
    receiver: Mutex<mpsc::UnboundedReceiver<JobPayload>>,
    submitted: AtomicUsize,
    result_ttl: Duration,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_result_ttl(DEFAULT_RESULT_TTL)
    }

    pub fn with_result_ttl(result_ttl: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            records: RwLock::new(HashMap::new()),
            sender,
            receiver: Mutex::new(receiver),
            submitted: AtomicUsize::new(0),
            result_ttl,
        }
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Number of records still held, expired ones included until the next write.
    pub async fn stored_count(&self) -> usize {
        self.records.read().await.len()
    }

    fn is_expired(&self, stored: &StoredRecord, now: Instant) -> bool {
        now.duration_since(stored.written_at) >= self.result_ttl
    }

    fn prune(&self, records: &mut HashMap<JobId, StoredRecord>, now: Instant) {
        let before = records.len();
        records.retain(|_, stored| !self.is_expired(stored, now));
        let evicted = before - records.len();
        if evicted > 0 {
            debug!("Evicted {} expired job record(s)", evicted);
        }
    }

    async fn update<F>(&self, job: &JobPayload, apply: F)
    where
        F: FnOnce(&mut JobRecord) -> bool + Send,
    {
        let now = Instant::now();
        let mut records = self.records.write().await;
        self.prune(&mut records, now);
        let stored = records.entry(job.id.clone()).or_insert_with(|| StoredRecord {
            record: JobRecord::pending(job),
            written_at: now,
        });
        if apply(&mut stored.record) {
            stored.written_at = now;
        } else {
            debug!(
                "Ignored stale update for job {} in state {}",
                job.id,
                stored.record.state.as_str()
            );
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobBackend for MemoryBackend {
    async fn submit(&self, request: AnnotationRequest) -> Result<JobId, BackendError> {
        let payload = JobPayload::new(JobId::generate(), request);
        let id = payload.id.clone();
        let now = Instant::now();
        {
            let mut records = self.records.write().await;
            self.prune(&mut records, now);
            records.insert(
                id.clone(),
                StoredRecord {
                    record: JobRecord::pending(&payload),
                    written_at: now,
                },
            );
        }
        self.sender
            .send(payload)
            .map_err(|_| BackendError::QueueClosed)?;
        self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn query(&self, id: &JobId) -> Result<Option<JobRecord>, BackendError> {
        let now = Instant::now();
        Ok(self
            .records
            .read()
            .await
            .get(id)
            .filter(|stored| !self.is_expired(stored, now))
            .map(|stored| stored.record.clone()))
    }

    async fn next_job(&self, timeout: Duration) -> Result<Option<JobPayload>, BackendError> {
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(timeout, receiver.recv()).await {
            Ok(Some(job)) => Ok(Some(job)),
            Ok(None) => Err(BackendError::QueueClosed),
            Err(_) => Ok(None),
        }
    }

    async fn report_progress(
        &self,
        job: &JobPayload,
        worker_id: &str,
        progress: Progress,
    ) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_progress(worker_id, progress))
            .await;
        Ok(())
    }

    async fn complete(&self, job: &JobPayload, result: AnnotationResult) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_success(result)).await;
        Ok(())
    }

    async fn fail(&self, job: &JobPayload, error: String) -> Result<(), BackendError> {
        self.update(job, |record| record.apply_failure(error)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationParams, JobKind, JobState, Operation};

    fn request() -> AnnotationRequest {
        AnnotationRequest {
            kind: JobKind::Annotate,
            text: "Albert Einstein lectured at the University of Berlin.".to_string(),
            params: AnnotationParams {
                operations: vec![Operation::Ner],
                language: None,
                include_references: true,
                entity_types: Vec::new(),
            },
        }
    }

    #[tokio::test]
    async fn submit_records_pending_and_enqueues() {
        let backend = MemoryBackend::new();
        let id = backend.submit(request()).await.unwrap();

        let record = backend.query(&id).await.unwrap().unwrap();
        assert_eq!(record.state, JobState::Pending);
        assert_eq!(backend.submitted_count(), 1);

        let job = backend
            .next_job(Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.id, id);
        assert_eq!(job.params.operations, vec![Operation::Ner]);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let backend = MemoryBackend::new();
        let first = backend.submit(request()).await.unwrap();
        let second = backend.submit(request()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn empty_queue_times_out() {
        let backend = MemoryBackend::new();
        let job = backend.next_job(Duration::from_millis(10)).await.unwrap();
        assert!(job.is_none());
    }

    #[tokio::test]
    async fn unknown_ids_have_no_record() {
        let backend = MemoryBackend::new();
        let record = backend.query(&JobId::from("nope".to_string())).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn records_expire_after_ttl() {
        let backend = MemoryBackend::with_result_ttl(Duration::from_millis(50));
        let old = backend.submit(request()).await.unwrap();
        let job = backend
            .next_job(Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();
        backend.fail(&job, "engine crashed".into()).await.unwrap();
        assert!(backend.query(&old).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(backend.query(&old).await.unwrap().is_none());

        let fresh = backend.submit(request()).await.unwrap();
        assert_eq!(backend.stored_count().await, 1);
        assert!(backend.query(&fresh).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failure_is_final() {
        let backend = MemoryBackend::new();
        let id = backend.submit(request()).await.unwrap();
        let job = backend
            .next_job(Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();

        backend
            .report_progress(&job, "worker-1", Progress::step(1, 3, "Loading document..."))
            .await
            .unwrap();
        backend.fail(&job, "engine crashed".into()).await.unwrap();
        backend
            .report_progress(&job, "worker-1", Progress::step(2, 3, "late"))
            .await
            .unwrap();

        let record = backend.query(&id).await.unwrap().unwrap();
        assert_eq!(record.state, JobState::Failure);
        assert_eq!(record.error.as_deref(), Some("engine crashed"));
        assert_eq!(record.worker_id.as_deref(), Some("worker-1"));
    }
}
