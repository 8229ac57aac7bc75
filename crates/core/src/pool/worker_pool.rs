//! Bounded-concurrency job execution.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use super::stop::StopSignal;
use super::traits::JobExecutor;
use super::types::PoolStatus;
use crate::job::{ErrorKind, FileJob, JobFailure, JobOutcome, JobResult, SkipReason};

/// Atomic counters behind [`PoolStatus`].
#[derive(Default)]
struct PoolStats {
    active: AtomicU64,
    queued: AtomicU64,
    total_processed: AtomicU64,
    total_failed: AtomicU64,
    total_skipped: AtomicU64,
}

impl PoolStats {
    fn to_status(&self, max_concurrent: usize) -> PoolStatus {
        PoolStatus {
            active: self.active.load(Ordering::Relaxed) as usize,
            queued: self.queued.load(Ordering::Relaxed) as usize,
            max_concurrent,
            total_processed: self.total_processed.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            total_skipped: self.total_skipped.load(Ordering::Relaxed),
        }
    }

    fn record(&self, outcome: &JobOutcome) {
        self.total_processed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            JobOutcome::Failed(_) => {
                self.total_failed.fetch_add(1, Ordering::Relaxed);
            }
            JobOutcome::Skipped(_) => {
                self.total_skipped.fetch_add(1, Ordering::Relaxed);
            }
            JobOutcome::Success(_) => {}
        }
    }
}

/// Runs file jobs with at most `max_concurrent` in flight.
///
/// Every job yields exactly one [`JobResult`]. Errors and panics inside a job
/// become that job's failure; the pool and sibling jobs carry on.
pub struct WorkerPool {
    executor: Arc<dyn JobExecutor>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    stats: Arc<PoolStats>,
    stop: StopSignal,
}

impl WorkerPool {
    /// Creates a pool. A concurrency of zero is treated as one.
    pub fn new(concurrency: usize, executor: Arc<dyn JobExecutor>) -> Self {
        let max_concurrent = concurrency.max(1);
        Self {
            executor,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            stats: Arc::new(PoolStats::default()),
            stop: StopSignal::new(),
        }
    }

    /// Uses an externally owned stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn status(&self) -> PoolStatus {
        self.stats.to_status(self.max_concurrent)
    }

    /// Dispatches `jobs` in the background and streams results as they
    /// finish, in completion order.
    pub fn spawn(&self, jobs: Vec<FileJob>) -> mpsc::Receiver<JobResult> {
        // One slot per job so workers never wait on a slow consumer.
        let (tx, rx) = mpsc::channel(jobs.len().max(1));

        let executor = Arc::clone(&self.executor);
        let semaphore = Arc::clone(&self.semaphore);
        let stats = Arc::clone(&self.stats);
        let stop = self.stop.clone();

        stats.queued.fetch_add(jobs.len() as u64, Ordering::Relaxed);
        info!(
            jobs = jobs.len(),
            max_concurrent = self.max_concurrent,
            executor = executor.name(),
            "Dispatching jobs"
        );

        tokio::spawn(async move {
            for job in jobs {
                if stop.is_raised() {
                    cancel(&stats, &tx, job).await;
                    continue;
                }

                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        cancel(&stats, &tx, job).await;
                        continue;
                    }
                };

                // The stop may have been raised while waiting for the permit.
                if stop.is_raised() {
                    drop(permit);
                    cancel(&stats, &tx, job).await;
                    continue;
                }

                stats.queued.fetch_sub(1, Ordering::Relaxed);
                stats.active.fetch_add(1, Ordering::Relaxed);

                let executor = Arc::clone(&executor);
                let stats = Arc::clone(&stats);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    let result = execute_isolated(executor.as_ref(), job).await;
                    stats.active.fetch_sub(1, Ordering::Relaxed);
                    stats.record(&result.outcome);
                    let _ = tx.send(result).await;
                });
            }
        });

        rx
    }

    /// Runs all jobs and collects every result.
    pub async fn run(&self, jobs: Vec<FileJob>) -> Vec<JobResult> {
        let expected = jobs.len();
        let mut rx = self.spawn(jobs);
        let mut results = Vec::with_capacity(expected);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        debug!(results = results.len(), "Pool drained");
        results
    }
}

async fn cancel(stats: &PoolStats, tx: &mpsc::Sender<JobResult>, job: FileJob) {
    stats.queued.fetch_sub(1, Ordering::Relaxed);
    let result = JobResult::skipped(job.id, job.file.path, SkipReason::Cancelled);
    stats.record(&result.outcome);
    let _ = tx.send(result).await;
}

/// Runs one job, converting errors and panics into its result.
async fn execute_isolated(executor: &dyn JobExecutor, job: FileJob) -> JobResult {
    let id = job.id;
    let path = job.file.path.clone();

    match AssertUnwindSafe(executor.execute(job)).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) if e.kind() == ErrorKind::InsufficientMetadata => {
            debug!(%id, path = %path.display(), "Skipped: {}", e);
            JobResult::skipped(id, path, SkipReason::InsufficientMetadata)
        }
        Ok(Err(e)) => {
            warn!(%id, path = %path.display(), kind = %e.kind(), "Job failed: {}", e);
            JobResult::failed(id, path, e.to_failure())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(%id, path = %path.display(), "Job panicked: {}", message);
            JobResult::failed(
                id,
                path,
                JobFailure::new(ErrorKind::Internal, format!("job panicked: {}", message)),
            )
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
