//! Mock executor for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::job::{FileJob, JobChanges, JobError, JobId, JobResult, SkipReason};
use crate::metadata::MetadataError;
use crate::pool::{JobExecutor, StopSignal};

/// Mock implementation of the JobExecutor trait.
///
/// Provides controllable behavior for testing:
/// - Simulated work duration
/// - Per-path failures, skips and panics
/// - Peak concurrency tracking
///
/// # Example
///
/// ```rust,ignore
/// use coverkit_core::testing::MockExecutor;
///
/// let executor = Arc::new(MockExecutor::new().with_delay_ms(10).panic_on("/m/bad.mp3"));
/// let pool = WorkerPool::new(2, executor.clone());
/// pool.run(jobs).await;
/// assert!(executor.max_concurrency() <= 2);
/// ```
#[derive(Debug, Default)]
pub struct MockExecutor {
    delay: Duration,
    fail_paths: HashSet<PathBuf>,
    skip_paths: HashSet<PathBuf>,
    panic_paths: HashSet<PathBuf>,
    raise_on_start: Option<StopSignal>,
    active: AtomicUsize,
    peak: AtomicUsize,
    executed: Arc<RwLock<Vec<JobId>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each job sleeps this long before finishing.
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    /// Jobs for `path` fail with a corrupt-container error.
    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_paths.insert(path.into());
        self
    }

    /// Jobs for `path` report no cover art.
    pub fn skip_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_paths.insert(path.into());
        self
    }

    /// Jobs for `path` panic.
    pub fn panic_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.panic_paths.insert(path.into());
        self
    }

    /// Raises `signal` as soon as any job starts.
    pub fn raise_on_start(mut self, signal: StopSignal) -> Self {
        self.raise_on_start = Some(signal);
        self
    }

    /// Highest number of jobs observed executing at once.
    pub fn max_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Ids of jobs that actually ran.
    pub async fn executed(&self) -> Vec<JobId> {
        self.executed.read().await.clone()
    }

    pub async fn executed_count(&self) -> usize {
        self.executed.read().await.len()
    }
}

#[async_trait]
impl JobExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, job: FileJob) -> Result<JobResult, JobError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.executed.write().await.push(job.id);

        if let Some(signal) = &self.raise_on_start {
            signal.raise();
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let path = job.file.path.clone();
        if self.panic_paths.contains(&path) {
            panic!("mock panic for {}", path.display());
        }
        if self.fail_paths.contains(&path) {
            return Err(MetadataError::corrupt(&path, "mock corruption").into());
        }
        if self.skip_paths.contains(&path) {
            return Ok(JobResult::skipped(job.id, path, SkipReason::NoCoverArt));
        }
        Ok(JobResult::success(job.id, path, JobChanges::new(job.dry_run)))
    }
}
