//! Job-level error type.

use thiserror::Error;

use super::types::{ErrorKind, JobFailure};
use crate::backup::BackupError;
use crate::cover::CoverError;
use crate::metadata::MetadataError;
use crate::rename::RenameError;

/// Any error that ends a single job. Never fatal to the run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Cover(#[from] CoverError),

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Panics, join failures and other faults outside the taxonomy.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Taxonomy kind reported for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Metadata(e) => match e {
                MetadataError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
                MetadataError::CorruptContainer { .. } => ErrorKind::CorruptContainer,
                MetadataError::WriteDenied { .. } => ErrorKind::WriteDenied,
                MetadataError::Io(_) => ErrorKind::Io,
            },
            Self::Cover(e) => match e {
                CoverError::UnsupportedImage { .. } => ErrorKind::UnsupportedImage,
                CoverError::EncodeFailed { .. } => ErrorKind::Internal,
                CoverError::Io(_) => ErrorKind::Io,
            },
            Self::Rename(e) => match e {
                RenameError::InsufficientMetadata { .. } => ErrorKind::InsufficientMetadata,
                RenameError::CollisionUnresolvable { .. } | RenameError::TargetExists { .. } => {
                    ErrorKind::CollisionUnresolvable
                }
                RenameError::CrossVolume { .. } => ErrorKind::CrossVolumeRename,
                RenameError::MoveFailed { error, .. }
                    if error.kind() == std::io::ErrorKind::PermissionDenied =>
                {
                    ErrorKind::WriteDenied
                }
                RenameError::MoveFailed { .. } | RenameError::Io(_) => ErrorKind::Io,
            },
            Self::Backup(_) => ErrorKind::BackupFailed,
            Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => ErrorKind::WriteDenied,
            Self::Io(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn to_failure(&self) -> JobFailure {
        JobFailure::new(self.kind(), self.to_string())
    }
}
