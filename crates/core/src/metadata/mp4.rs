//! MP4/M4A adapter.

use std::path::Path;

use lofty::tag::TagType;

use super::error::MetadataError;
use super::lofty_io;
use super::traits::MetadataAdapter;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};

/// iTunes-style `ilst` atoms.
#[derive(Debug, Default, Clone)]
pub struct Mp4Adapter;

impl Mp4Adapter {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataAdapter for Mp4Adapter {
    fn name(&self) -> &str {
        "mp4"
    }

    fn format(&self) -> ContainerFormat {
        ContainerFormat::Mp4
    }

    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError> {
        lofty_io::read_snapshot(path, &[TagType::Mp4Ilst])
    }

    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError> {
        lofty_io::write_atomic(path, Some(TagType::Mp4Ilst), patch)
    }
}
