// backend/src/jobs/tracker.rs

use std::sync::Arc;

use crate::{
    backend::JobBackend,
    error::BackendError,
    models::{JobId, JobRecord, JobState, JobStatusView},
};

pub const PENDING_MESSAGE: &str = "Task is waiting for execution or unknown. \
                                   Any task id that is not known is implied to be in the pending state.";
pub const COMPLETED_MESSAGE: &str = "Processing completed.";

/// Read-only view of job state for polling clients.
#[derive(Clone)]
pub struct JobTracker {
    backend: Arc<dyn JobBackend>,
}

impl JobTracker {
    pub fn new(backend: Arc<dyn JobBackend>) -> Self {
        Self { backend }
    }

    /// Unknown ids are PENDING. Backend faults are errors, never PENDING.
    pub async fn status(&self, id: &JobId) -> Result<JobStatusView, BackendError> {
        let record = self.backend.query(id).await?;
        Ok(record.map_or_else(pending_view, status_view))
    }
}

fn pending_view() -> JobStatusView {
    JobStatusView {
        state: JobState::Pending,
        status: PENDING_MESSAGE.to_string(),
        current: None,
        total: None,
        result: None,
    }
}

fn status_view(record: JobRecord) -> JobStatusView {
    match record.state {
        JobState::Pending => pending_view(),
        JobState::Progress => {
            let progress = record.progress.unwrap_or_default();
            JobStatusView {
                state: JobState::Progress,
                status: progress.message.unwrap_or_default(),
                current: Some(progress.current.unwrap_or(0)),
                total: Some(progress.total.unwrap_or(1)),
                result: None,
            }
        }
        JobState::Success => JobStatusView {
            state: JobState::Success,
            status: COMPLETED_MESSAGE.to_string(),
            current: None,
            total: None,
            result: record.result,
        },
        JobState::Failure => JobStatusView {
            state: JobState::Failure,
            status: record.error.unwrap_or_default(),
            current: None,
            total: None,
            result: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::MemoryBackend,
        models::{
            AnnotationParams, AnnotationRequest, AnnotationResult, DocumentMetadata, JobKind,
            JobPayload, Language, Operation, Progress,
        },
    };
    use std::time::Duration;

    async fn submitted(backend: &MemoryBackend) -> (JobId, JobPayload) {
        let id = backend
            .submit(AnnotationRequest {
                kind: JobKind::Annotate,
                text: "Gestern reiste Angela Merkel nach Rom.".to_string(),
                params: AnnotationParams {
                    operations: Operation::ALL.to_vec(),
                    language: None,
                    include_references: true,
                    entity_types: Vec::new(),
                },
            })
            .await
            .unwrap();
        let job = backend
            .next_job(Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();
        (id, job)
    }

    fn tracker_for(backend: &Arc<MemoryBackend>) -> JobTracker {
        JobTracker::new(backend.clone())
    }

    #[tokio::test]
    async fn unknown_id_is_pending() {
        let backend = Arc::new(MemoryBackend::new());
        let view = tracker_for(&backend)
            .status(&JobId::from("does-not-exist".to_string()))
            .await
            .unwrap();
        assert_eq!(view.state, JobState::Pending);
        assert_eq!(view.status, PENDING_MESSAGE);
        assert!(view.result.is_none());
    }

    #[tokio::test]
    async fn progress_fields_get_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        let (id, job) = submitted(&backend).await;
        backend
            .report_progress(&job, "worker-1", Progress::default())
            .await
            .unwrap();

        let view = tracker_for(&backend).status(&id).await.unwrap();
        assert_eq!(view.state, JobState::Progress);
        assert_eq!(view.current, Some(0));
        assert_eq!(view.total, Some(1));
        assert_eq!(view.status, "");
    }

    #[tokio::test]
    async fn completed_polls_are_identical() {
        let backend = Arc::new(MemoryBackend::new());
        let (id, job) = submitted(&backend).await;
        let result = AnnotationResult {
            named_entities: Some(Vec::new()),
            part_of_speech_tags: Some(Vec::new()),
            entities: None,
            metadata: DocumentMetadata {
                detected_language: Some(Language::De),
                word_count: 6,
                sentence_count: 1,
            },
        };
        backend.complete(&job, result.clone()).await.unwrap();

        let tracker = tracker_for(&backend);
        let first = serde_json::to_vec(&tracker.status(&id).await.unwrap()).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_vec(&tracker.status(&id).await.unwrap()).unwrap();
            assert_eq!(first, again);
        }
        let view = tracker.status(&id).await.unwrap();
        assert_eq!(view.status, COMPLETED_MESSAGE);
        assert_eq!(view.result, Some(result));
    }

    #[tokio::test]
    async fn evicted_result_reads_pending() {
        let backend = Arc::new(MemoryBackend::with_result_ttl(Duration::from_millis(50)));
        let (id, job) = submitted(&backend).await;
        backend.fail(&job, "analysis failed".into()).await.unwrap();

        let tracker = tracker_for(&backend);
        assert_eq!(tracker.status(&id).await.unwrap().state, JobState::Failure);

        tokio::time::sleep(Duration::from_millis(80)).await;
        let view = tracker.status(&id).await.unwrap();
        assert_eq!(view.state, JobState::Pending);
        assert_eq!(view.status, PENDING_MESSAGE);
    }

    #[tokio::test]
    async fn failure_surfaces_message_only() {
        let backend = Arc::new(MemoryBackend::new());
        let (id, job) = submitted(&backend).await;
        backend
            .fail(&job, "analysis failed: model missing".into())
            .await
            .unwrap();

        let view = tracker_for(&backend).status(&id).await.unwrap();
        assert_eq!(view.state, JobState::Failure);
        assert_eq!(view.status, "analysis failed: model missing");
        assert!(view.result.is_none());
    }
}
