//! Trait definitions for the pool module.

use async_trait::async_trait;

use crate::job::{FileJob, JobError, JobResult};

/// Runs one file job to completion.
///
/// Implementations may return errors or even panic; the pool turns both into
/// a failed [`JobResult`] for that job alone.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Returns the name of this executor implementation.
    fn name(&self) -> &str;

    /// Executes a job.
    async fn execute(&self, job: FileJob) -> Result<JobResult, JobError>;
}
