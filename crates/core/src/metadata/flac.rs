//! FLAC adapter.

use std::path::Path;

use lofty::tag::TagType;

use super::error::MetadataError;
use super::lofty_io;
use super::traits::MetadataAdapter;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};

/// Vorbis comments; pictures live in `PICTURE` metadata blocks, which lofty
/// exposes through the same tag.
#[derive(Debug, Default, Clone)]
pub struct FlacAdapter;

impl FlacAdapter {
    // Some taggers put ID3v2 in front of FLAC streams.
    const READ_ORDER: &'static [TagType] = &[TagType::VorbisComments, TagType::Id3v2];

    pub fn new() -> Self {
        Self
    }
}

impl MetadataAdapter for FlacAdapter {
    fn name(&self) -> &str {
        "flac"
    }

    fn format(&self) -> ContainerFormat {
        ContainerFormat::Flac
    }

    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError> {
        lofty_io::read_snapshot(path, Self::READ_ORDER)
    }

    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError> {
        lofty_io::write_atomic(path, Some(TagType::VorbisComments), patch)
    }
}
