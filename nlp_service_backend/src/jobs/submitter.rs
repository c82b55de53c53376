// backend/src/jobs/submitter.rs

use std::sync::Arc;
use tracing::info;

use crate::{
    backend::JobBackend,
    error::BackendError,
    models::{AnnotationRequest, JobId},
};

/// Hands validated requests to the backend and returns immediately.
#[derive(Clone)]
pub struct JobSubmitter {
    backend: Arc<dyn JobBackend>,
}

impl JobSubmitter {
    pub fn new(backend: Arc<dyn JobBackend>) -> Self {
        Self { backend }
    }

    pub async fn submit(&self, request: AnnotationRequest) -> Result<JobId, BackendError> {
        let kind = request.kind;
        let length = request.text.len();
        let id = self.backend.submit(request).await?;
        info!("Queued {} job {} ({} bytes)", kind.as_str(), id, length);
        Ok(id)
    }
}
