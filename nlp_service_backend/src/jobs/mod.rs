// backend/src/jobs/mod.rs

mod submitter;
mod tracker;

pub use submitter::JobSubmitter;
pub use tracker::{JobTracker, COMPLETED_MESSAGE, PENDING_MESSAGE};
