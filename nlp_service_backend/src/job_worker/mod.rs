// backend/src/job_worker/mod.rs

pub mod assembler;

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinHandle},
    time::sleep,
};
use tracing::{debug, error, info, warn};

use crate::{
    backend::JobBackend,
    engine::{AnalysisEngine, EngineError},
    models::{AnnotationResult, JobKind, JobPayload, Operation, Progress},
};
use assembler::{assemble, OperationOutputs};

const FETCH_RETRY_DELAY: Duration = Duration::from_secs(1);

// Decouples job execution logic from the worker queue management loop.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Progress sent on `progress` is forwarded to the backend as it arrives.
    async fn execute(
        &self,
        job: &JobPayload,
        progress: mpsc::UnboundedSender<Progress>,
    ) -> Result<AnnotationResult, String>;
}

/// Runs jobs through an [`AnalysisEngine`] on the blocking thread pool.
pub struct AnnotationExecutor {
    engine: Arc<dyn AnalysisEngine>,
}

impl AnnotationExecutor {
    pub fn new(engine: Arc<dyn AnalysisEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobExecutor for AnnotationExecutor {
    async fn execute(
        &self,
        job: &JobPayload,
        progress: mpsc::UnboundedSender<Progress>,
    ) -> Result<AnnotationResult, String> {
        let engine = Arc::clone(&self.engine);
        let job = job.clone();
        let outcome =
            tokio::task::spawn_blocking(move || run_pipeline(engine.as_ref(), &job, &progress))
                .await;

        match outcome {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(describe_join_error(e)),
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if !err.is_panic() {
        return "analysis was cancelled".to_string();
    }
    let panic = err.into_panic();
    let reason = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("analysis engine panicked: {}", reason)
}

/// Executes the passes a job asked for, NER before POS. Blocking.
pub fn run_pipeline(
    engine: &dyn AnalysisEngine,
    job: &JobPayload,
    progress: &mpsc::UnboundedSender<Progress>,
) -> Result<AnnotationResult, EngineError> {
    let passes = match job.kind {
        JobKind::Annotate => job.params.operations.len() as u32,
        JobKind::GetEntities => 2,
    };
    let total = passes + 2;
    let mut step = 0;
    let mut report = |message: &str| {
        debug!("Job {}: step {}/{} {}", job.id, step, total, message);
        // Receiver gone means nobody is listening; progress is best effort.
        let _ = progress.send(Progress::step(step, total, message));
        step += 1;
    };

    report("Running NLP analysis...");
    let mut document = engine.load(&job.text)?;
    if let Some(language) = job.params.language {
        document.set_language(language);
    }

    let mut outputs = OperationOutputs::default();
    match job.kind {
        JobKind::Annotate => {
            for operation in Operation::ALL {
                if !job.params.operations.contains(&operation) {
                    continue;
                }
                match operation {
                    Operation::Ner => {
                        report("Running named-entity recognition...");
                        outputs.named_entities = Some(document.ner()?);
                    }
                    Operation::Pos => {
                        report("Running part-of-speech tagging...");
                        outputs.part_of_speech_tags = Some(document.pos_tag()?);
                    }
                }
            }
        }
        JobKind::GetEntities => {
            report("Running named-entity recognition...");
            let named = document.ner()?;
            report("Extracting entities...");
            outputs.entities = Some(document.entities(
                &named,
                &job.params.entity_types,
                job.params.include_references,
            )?);
        }
    }

    report("Assembling result...");
    Ok(assemble(outputs, document.as_ref()))
}

pub fn spawn_workers(
    count: usize,
    backend: Arc<dyn JobBackend>,
    executor: Arc<dyn JobExecutor>,
    dequeue_timeout: Duration,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    (1..=count)
        .map(|n| {
            let worker_id = format!("worker-{}-{}", std::process::id(), n);
            tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&backend),
                Arc::clone(&executor),
                dequeue_timeout,
                shutdown.clone(),
            ))
        })
        .collect()
}

pub async fn run_worker(
    worker_id: String,
    backend: Arc<dyn JobBackend>,
    executor: Arc<dyn JobExecutor>,
    dequeue_timeout: Duration,
    shutdown: watch::Receiver<bool>,
) {
    info!("Starting annotation worker: {}", worker_id);

    // The dequeue is never cancelled: a popped job must be processed, so
    // shutdown is only observed between bounded waits.
    while !*shutdown.borrow() {
        let job = match backend.next_job(dequeue_timeout).await {
            Ok(Some(job)) => job,
            Ok(None) => continue, // Timeout: no job found, continue loop
            Err(e) => {
                error!(
                    "Worker {} failed to fetch next job: {}. Retrying in {}s.",
                    worker_id,
                    e,
                    FETCH_RETRY_DELAY.as_secs()
                );
                sleep(FETCH_RETRY_DELAY).await;
                continue;
            }
        };

        process_job(&worker_id, backend.as_ref(), executor.as_ref(), job).await;
    }

    info!("Worker {} stopped.", worker_id);
}

pub async fn process_job(
    worker_id: &str,
    backend: &dyn JobBackend,
    executor: &dyn JobExecutor,
    job: JobPayload,
) {
    info!("Worker {} processing job {} ({})", worker_id, job.id, job.kind.as_str());

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let forward_progress = async {
        while let Some(progress) = progress_rx.recv().await {
            if let Err(e) = backend.report_progress(&job, worker_id, progress).await {
                warn!("Could not record progress for job {}: {}", job.id, e);
            }
        }
    };

    let (outcome, ()) = tokio::join!(executor.execute(&job, progress_tx), forward_progress);

    let stored = match outcome {
        Ok(result) => {
            info!("Job {} completed successfully.", job.id);
            backend.complete(&job, result).await
        }
        Err(err) => {
            warn!("Job {} failed: {}", job.id, err);
            backend.fail(&job, err).await
        }
    };

    if let Err(e) = stored {
        error!("Failed to store outcome of job {}: {}", job.id, e);
    }
}
