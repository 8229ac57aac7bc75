//! Error types for the rename module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while planning or applying a rename.
#[derive(Debug, Error)]
pub enum RenameError {
    /// Neither a track number nor a usable title/album is available.
    #[error("Not enough metadata to name {path}")]
    InsufficientMetadata { path: PathBuf },

    /// Every suffix up to the configured limit is taken.
    #[error("No free name for {path} after {attempts} attempts")]
    CollisionUnresolvable { path: PathBuf, attempts: u32 },

    /// Source and target are on different filesystems.
    #[error("Rename crosses filesystems: {from} -> {to}")]
    CrossVolume { from: PathBuf, to: PathBuf },

    /// The target appeared between planning and moving.
    #[error("Target already exists: {path}")]
    TargetExists { path: PathBuf },

    /// Failed to move the entry.
    #[error("Failed to move {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenameError {
    pub fn move_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed { from, to, error }
    }

    /// Whether the caller should try the next collision suffix.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::TargetExists { .. })
    }
}
