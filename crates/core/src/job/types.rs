//! Job and result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::cover::CoverOrigin;
use crate::metadata::AudioFile;

/// Sequential id of a job within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// What a file job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperation {
    EmbedOnly,
    RenameOnly,
    Both,
}

impl FileOperation {
    pub fn embeds(&self) -> bool {
        matches!(self, Self::EmbedOnly | Self::Both)
    }

    pub fn renames(&self) -> bool {
        matches!(self, Self::RenameOnly | Self::Both)
    }
}

/// One unit of per-file work. Consumed by exactly one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileJob {
    pub id: JobId,
    pub file: AudioFile,
    pub operation: FileOperation,
    pub dry_run: bool,
    pub backup: bool,
}

impl FileJob {
    pub fn new(id: JobId, file: AudioFile, operation: FileOperation) -> Self {
        Self {
            id,
            file,
            operation,
            dry_run: false,
            backup: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file.path
    }
}

/// Failure taxonomy shared by file and folder jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    CorruptContainer,
    WriteDenied,
    UnsupportedImage,
    InsufficientMetadata,
    BackupFailed,
    CrossVolumeRename,
    CollisionUnresolvable,
    Io,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "unsupported_format",
            Self::CorruptContainer => "corrupt_container",
            Self::WriteDenied => "write_denied",
            Self::UnsupportedImage => "unsupported_image",
            Self::InsufficientMetadata => "insufficient_metadata",
            Self::BackupFailed => "backup_failed",
            Self::CrossVolumeRename => "cross_volume_rename",
            Self::CollisionUnresolvable => "collision_unresolvable",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a job did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not enough tags to compute a name.
    InsufficientMetadata,
    /// Nothing embedded and no sidecar image.
    NoCoverArt,
    /// The run was stopped before this job started.
    Cancelled,
    /// Named like a backup, but its original is gone; never modified.
    UnpairedBackup,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InsufficientMetadata => "insufficient metadata",
            Self::NoCoverArt => "no cover art",
            Self::Cancelled => "cancelled",
            Self::UnpairedBackup => "backup without its original",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl JobFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// What happened to the embedded cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverChange {
    /// The job did not touch covers.
    #[default]
    NotRequested,
    /// Already a normalized JPEG.
    Unchanged,
    /// An embedded cover was re-encoded.
    Replaced,
    /// A sidecar image was embedded.
    Embedded,
    /// No cover anywhere.
    Missing,
}

impl CoverChange {
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Replaced | Self::Embedded)
    }
}

/// Changes made (or, for dry runs, that would be made) by a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobChanges {
    pub cover: CoverChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_origin: Option<CoverOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl JobChanges {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Whether anything on disk changed or would change.
    pub fn is_modification(&self) -> bool {
        self.cover.is_write() || self.renamed_to.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum JobOutcome {
    Success(JobChanges),
    Skipped(SkipReason),
    Failed(JobFailure),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of one file job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: JobId,
    pub path: PathBuf,
    pub outcome: JobOutcome,
    pub before_path: PathBuf,
    /// Where the file is after the job; differs from `before_path` only when
    /// a rename actually happened.
    pub after_path: PathBuf,
}

impl JobResult {
    fn with_outcome(job_id: JobId, path: PathBuf, outcome: JobOutcome) -> Self {
        Self {
            job_id,
            before_path: path.clone(),
            after_path: path.clone(),
            path,
            outcome,
        }
    }

    pub fn success(job_id: JobId, path: PathBuf, changes: JobChanges) -> Self {
        Self::with_outcome(job_id, path, JobOutcome::Success(changes))
    }

    pub fn skipped(job_id: JobId, path: PathBuf, reason: SkipReason) -> Self {
        Self::with_outcome(job_id, path, JobOutcome::Skipped(reason))
    }

    pub fn failed(job_id: JobId, path: PathBuf, failure: JobFailure) -> Self {
        Self::with_outcome(job_id, path, JobOutcome::Failed(failure))
    }

    pub fn with_after_path(mut self, after: PathBuf) -> Self {
        self.after_path = after;
        self
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        match &self.outcome {
            JobOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }
}
