//! MP3 adapter.

use std::path::Path;

use lofty::tag::TagType;

use super::error::MetadataError;
use super::lofty_io;
use super::traits::MetadataAdapter;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};

/// ID3v2 for writes; ID3v1 and APE fill gaps on read.
#[derive(Debug, Default, Clone)]
pub struct Mp3Adapter;

impl Mp3Adapter {
    const READ_ORDER: &'static [TagType] = &[TagType::Id3v2, TagType::Id3v1, TagType::Ape];

    pub fn new() -> Self {
        Self
    }
}

impl MetadataAdapter for Mp3Adapter {
    fn name(&self) -> &str {
        "mp3"
    }

    fn format(&self) -> ContainerFormat {
        ContainerFormat::Mp3
    }

    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError> {
        lofty_io::read_snapshot(path, Self::READ_ORDER)
    }

    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError> {
        lofty_io::write_atomic(path, Some(TagType::Id3v2), patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::CoverImage;
    use crate::testing::fixtures;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_untagged_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plain.mp3");
        fs::write(&path, fixtures::mp3_bytes()).unwrap();

        let snapshot = Mp3Adapter::new().read(&path).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_write_then_read_tags_and_cover() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        fs::write(&path, fixtures::mp3_bytes()).unwrap();
        let adapter = Mp3Adapter::new();

        let cover = CoverImage::from_bytes(fixtures::jpeg_bytes(16, 16));
        let patch = TagPatch {
            track_number: Some(3),
            title: Some("Song".to_string()),
            album: Some("Record".to_string()),
            cover: Some(cover.clone()),
        };
        adapter.write(&path, &patch).unwrap();

        let snapshot = adapter.read(&path).unwrap();
        assert_eq!(snapshot.track_number, Some(3));
        assert_eq!(snapshot.title.as_deref(), Some("Song"));
        assert_eq!(snapshot.album.as_deref(), Some("Record"));
        assert_eq!(snapshot.cover, Some(cover));
    }

    #[test]
    fn test_missing_file_is_io() {
        let temp = TempDir::new().unwrap();
        let result = Mp3Adapter::new().read(&temp.path().join("gone.mp3"));
        assert!(matches!(result, Err(MetadataError::Io(_))));
    }
}
