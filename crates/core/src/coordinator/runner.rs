//! Whole-run orchestration.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::discovery::discover_audio_files;
use super::folders::{album_directories, FolderRenamer};
use super::report::{FolderResult, RunReport};
use crate::backup::BackupManager;
use crate::config::{validate_config, ConfigError, RunConfig};
use crate::job::{FileJob, FileProcessor, JobId, JobOutcome, JobResult, SkipReason};
use crate::metadata::AdapterRegistry;
use crate::pool::{JobExecutor, StopSignal, WorkerPool};
use crate::rename::RenamePlanner;

/// Errors that abort a run before any job starts.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Walks the root, runs file jobs on the pool, then renames folders.
pub struct RunCoordinator {
    config: RunConfig,
    stop: StopSignal,
    executor: Option<Arc<dyn JobExecutor>>,
}

impl RunCoordinator {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            stop: StopSignal::new(),
            executor: None,
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Replaces the file executor, e.g. with a mock.
    pub fn with_executor(mut self, executor: Arc<dyn JobExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs to completion. Only configuration problems are errors; every
    /// per-file problem ends up in the report.
    pub async fn execute(&self) -> Result<RunReport, RunError> {
        validate_config(&self.config)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let config = &self.config;
        info!(
            %run_id,
            root = %config.root.display(),
            mode = %config.mode,
            dry_run = config.dry_run,
            workers = config.workers,
            "Starting run"
        );

        let backups = BackupManager::new(config.backups.clone());

        let files = match config.mode.file_operation() {
            Some(operation) => {
                let discovered = discover_audio_files(&config.root, &backups);
                info!(files = discovered.len(), "File phase");

                let jobs: Vec<FileJob> = discovered
                    .into_iter()
                    .enumerate()
                    .map(|(i, file)| {
                        FileJob::new(JobId(i as u64), file, operation)
                            .with_dry_run(config.dry_run)
                            .with_backup(config.backup)
                    })
                    .collect();

                let executor = self
                    .executor
                    .clone()
                    .unwrap_or_else(|| Arc::new(FileProcessor::from_config(config)));
                let pool = WorkerPool::new(config.workers, executor).with_stop_signal(self.stop.clone());

                let mut results = pool.run(jobs).await;
                results.sort_by(|a, b| a.path.cmp(&b.path));
                for result in &results {
                    self.log_result(result);
                }
                results
            }
            None => Vec::new(),
        };

        let folders = if config.renames_folders() {
            self.folder_phase(backups).await?
        } else {
            Vec::new()
        };

        let report = RunReport::build(run_id, started_at, config.mode, config.dry_run, files, folders);
        info!(
            %run_id,
            total = report.total,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            duration_ms = report.duration_ms(),
            "Run finished"
        );
        Ok(report)
    }

    /// Sequential renaming of the root's album folders after all file jobs
    /// finished.
    async fn folder_phase(&self, backups: BackupManager) -> Result<Vec<FolderResult>, RunError> {
        let config = self.config.clone();
        let stop = self.stop.clone();

        tokio::task::spawn_blocking(move || {
            // Re-walk: the file phase may have renamed files.
            let files: Vec<_> = discover_audio_files(&config.root, &backups)
                .into_iter()
                .map(|f| f.path)
                .collect();
            let dirs = album_directories(&config.root, &files);
            info!(folders = dirs.len(), "Folder phase");

            let renamer = FolderRenamer::new(
                AdapterRegistry::with_defaults(),
                RenamePlanner::new(config.rename.clone()),
                backups,
                config.dry_run,
            );

            dirs.into_iter()
                .map(|dir| {
                    if stop.is_raised() {
                        FolderResult {
                            after_path: dir.clone(),
                            path: dir,
                            outcome: JobOutcome::Skipped(SkipReason::Cancelled),
                        }
                    } else {
                        renamer.rename(&dir)
                    }
                })
                .collect()
        })
        .await
        .map_err(|e| RunError::Internal(format!("folder phase failed: {}", e)))
    }

    fn log_result(&self, result: &JobResult) {
        match &result.outcome {
            JobOutcome::Failed(failure) => warn!(
                path = %result.path.display(),
                kind = %failure.kind,
                "{}",
                failure.message
            ),
            outcome if self.config.verbose => info!(
                path = %result.path.display(),
                ?outcome,
                "Job finished"
            ),
            outcome => debug!(path = %result.path.display(), ?outcome, "Job finished"),
        }
    }
}
