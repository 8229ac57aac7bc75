//! Ogg adapter (Vorbis, Opus, Speex).

use std::path::Path;

use lofty::tag::TagType;

use super::error::MetadataError;
use super::lofty_io;
use super::traits::MetadataAdapter;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};

/// Vorbis comments, with covers as `METADATA_BLOCK_PICTURE` fields.
#[derive(Debug, Default, Clone)]
pub struct OggAdapter;

impl OggAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataAdapter for OggAdapter {
    fn name(&self) -> &str {
        "ogg"
    }

    fn format(&self) -> ContainerFormat {
        ContainerFormat::Ogg
    }

    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError> {
        lofty_io::read_snapshot(path, &[TagType::VorbisComments])
    }

    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError> {
        lofty_io::write_atomic(path, Some(TagType::VorbisComments), patch)
    }
}
