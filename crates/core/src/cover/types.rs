//! Types for the cover module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image encoding detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl ImageKind {
    /// Sniffs the encoding from the first bytes of an image.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Self::Png
        } else if data.starts_with(b"GIF8") {
            Self::Gif
        } else if data.starts_with(b"BM") {
            Self::Bmp
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::Webp
        } else {
            Self::Unknown
        }
    }

    /// MIME type used when embedding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Webp => "webp",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Raw cover art bytes plus what could be learned without decoding pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Encoded image bytes exactly as stored.
    pub data: Vec<u8>,
    /// Encoding sniffed from the bytes.
    pub kind: ImageKind,
    /// Declared dimensions, when the header could be read.
    pub dimensions: Option<(u32, u32)>,
}

impl CoverImage {
    /// Wraps raw bytes, sniffing kind and reading dimensions from the header.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let kind = ImageKind::sniff(&data);
        let dimensions = super::normalizer::read_dimensions(&data);
        Self {
            data,
            kind,
            dimensions,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for CoverImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverImage")
            .field("bytes", &self.data.len())
            .field("kind", &self.kind)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

/// Output of [`CoverNormalizer::normalize`](super::CoverNormalizer::normalize).
#[derive(Debug, Clone)]
pub struct NormalizedCover {
    /// JPEG bytes at the target size.
    pub data: Vec<u8>,
    /// False when the input was already a JPEG of the target size and is
    /// returned untouched.
    pub changed: bool,
    pub width: u32,
    pub height: u32,
}

/// Where the cover fed into the normalizer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverOrigin {
    /// Already embedded in the audio file.
    Embedded,
    /// Image file found next to the audio file.
    Sidecar { path: std::path::PathBuf },
}
