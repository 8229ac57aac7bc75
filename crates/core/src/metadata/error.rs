//! Error types for the metadata module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing tags.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No adapter handles this container.
    #[error("Unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The file does not parse as the container its extension claims.
    #[error("Corrupt container {path}: {reason}")]
    CorruptContainer { path: PathBuf, reason: String },

    /// The filesystem refused the write.
    #[error("Write denied: {path}")]
    WriteDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptContainer {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Maps an I/O error, turning permission failures into `WriteDenied`.
    pub fn from_write_io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::PermissionDenied {
            Self::WriteDenied {
                path: path.into(),
                source: error,
            }
        } else {
            Self::Io(error)
        }
    }
}
