//! Run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::RunMode;
use crate::job::{ErrorKind, JobOutcome, JobResult};

/// Outcome of renaming one album folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderResult {
    pub path: PathBuf,
    pub outcome: JobOutcome,
    pub after_path: PathBuf,
}

/// One line of the failure log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Everything a run did, in a form that can be printed or serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mode: RunMode,
    pub dry_run: bool,
    /// File jobs plus folders.
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<FailureEntry>,
    pub files: Vec<JobResult>,
    pub folders: Vec<FolderResult>,
}

impl RunReport {
    /// Aggregates counts and the failure log from raw results.
    pub fn build(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        mode: RunMode,
        dry_run: bool,
        files: Vec<JobResult>,
        folders: Vec<FolderResult>,
    ) -> Self {
        let outcomes = files
            .iter()
            .map(|r| (&r.path, &r.outcome))
            .chain(folders.iter().map(|f| (&f.path, &f.outcome)));

        let mut succeeded = 0;
        let mut skipped = 0;
        let mut failures = Vec::new();
        for (path, outcome) in outcomes {
            match outcome {
                JobOutcome::Success(_) => succeeded += 1,
                JobOutcome::Skipped(_) => skipped += 1,
                JobOutcome::Failed(failure) => failures.push(FailureEntry {
                    path: path.clone(),
                    kind: failure.kind,
                    message: failure.message.clone(),
                }),
            }
        }

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            mode,
            dry_run,
            total: files.len() + folders.len(),
            succeeded,
            skipped,
            failed: failures.len(),
            failures,
            files,
            folders,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Files whose outcome changed something, or would in a dry run.
    pub fn modified_files(&self) -> impl Iterator<Item = &JobResult> {
        self.files.iter().filter(|r| match &r.outcome {
            JobOutcome::Success(changes) => changes.is_modification(),
            _ => false,
        })
    }
}
