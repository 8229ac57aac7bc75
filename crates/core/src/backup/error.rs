//! Error types for the backup module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while creating a backup.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Copying the original failed.
    #[error("Failed to back up {path}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The copy does not match the original.
    #[error("Checksum mismatch for backup of {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The path has no file name to derive a backup name from.
    #[error("Cannot derive a backup name for {path}")]
    InvalidPath { path: PathBuf },
}

impl BackupError {
    pub fn copy_failed(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::CopyFailed {
            path: path.into(),
            error,
        }
    }
}
