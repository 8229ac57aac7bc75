//! Error types for the cover module.

use thiserror::Error;

/// Errors that can occur while normalizing cover art.
#[derive(Debug, Error)]
pub enum CoverError {
    /// The bytes are not an image any enabled decoder understands.
    #[error("Unsupported image: {reason}")]
    UnsupportedImage { reason: String },

    /// Decoding worked but JPEG encoding failed.
    #[error("Failed to encode JPEG: {reason}")]
    EncodeFailed { reason: String },

    /// Reading a sidecar image failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoverError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedImage {
            reason: reason.into(),
        }
    }

    pub fn encode_failed(reason: impl Into<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
        }
    }
}
