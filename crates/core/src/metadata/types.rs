//! Types for the metadata module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cover::CoverImage;

/// Container format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    Mp3,
    Mp4,
    Flac,
    Ogg,
    /// Anything else in the discovery list; handled best-effort.
    Unknown,
}

impl ContainerFormat {
    /// Extensions of every file the walk turns into a job.
    pub const DISCOVERY_EXTENSIONS: &'static [&'static str] = &[
        "mp3", "m4a", "mp4", "m4b", "flac", "ogg", "oga", "opus", "wav", "aac", "wma", "aiff",
    ];

    /// Detects the format from an extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Self::Mp3,
            "m4a" | "mp4" | "m4b" => Self::Mp4,
            "flac" => Self::Flac,
            "ogg" | "oga" | "opus" => Self::Ogg,
            _ => Self::Unknown,
        }
    }

    /// Detects the format of a path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Whether the walk should pick this path up at all.
    pub fn is_discoverable(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                Self::DISCOVERY_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(e))
            })
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An audio file found by the walk. The path is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFile {
    pub path: PathBuf,
    pub format: ContainerFormat,
}

impl AudioFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ContainerFormat::from_path(&path);
        Self { path, format }
    }
}

/// Tags read from a file at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    /// Track number; zero is never stored.
    pub track_number: Option<u32>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// Front cover, or the first picture when no front cover is tagged.
    pub cover: Option<CoverImage>,
}

impl TagSnapshot {
    pub fn is_empty(&self) -> bool {
        self.track_number.is_none()
            && self.title.is_none()
            && self.album.is_none()
            && self.cover.is_none()
    }

    /// Fills fields that are missing here from `other`.
    pub fn fill_missing_from(&mut self, other: TagSnapshot) {
        if self.track_number.is_none() {
            self.track_number = other.track_number;
        }
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.album.is_none() {
            self.album = other.album;
        }
        if self.cover.is_none() {
            self.cover = other.cover;
        }
    }
}

/// A partial tag update. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub track_number: Option<u32>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// Replaces every front-cover picture with this single one.
    pub cover: Option<CoverImage>,
}

impl TagPatch {
    pub fn cover(cover: CoverImage) -> Self {
        Self {
            cover: Some(cover),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.track_number.is_none()
            && self.title.is_none()
            && self.album.is_none()
            && self.cover.is_none()
    }
}

/// Normalizes a tag string: trims and drops empty values.
pub(crate) fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
