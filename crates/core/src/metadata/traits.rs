//! Trait definitions for the metadata module.

use std::path::Path;

use super::error::MetadataError;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};
use crate::cover::CoverImage;

/// Uniform tag access for one container format.
///
/// Implementations are synchronous; async callers run them on the blocking
/// pool.
pub trait MetadataAdapter: Send + Sync {
    /// Returns the name of this adapter implementation.
    fn name(&self) -> &str;

    /// The container format this adapter handles.
    fn format(&self) -> ContainerFormat;

    /// Reads track number, title, album and cover.
    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError>;

    /// Reads only the cover.
    fn read_cover(&self, path: &Path) -> Result<Option<CoverImage>, MetadataError> {
        Ok(self.read(path)?.cover)
    }

    /// Applies `patch` in place. Either the old or the new tags are visible
    /// to concurrent readers, never a partial write.
    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError>;

    /// Replaces the embedded cover.
    fn write_cover(&self, path: &Path, cover: CoverImage) -> Result<(), MetadataError> {
        self.write(path, &TagPatch::cover(cover))
    }
}
