//! Shared lofty plumbing for the adapters.

use std::fs;
use std::io;
use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::error::{ErrorKind as LoftyErrorKind, LoftyError};
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{Tag, TagType};
use tracing::{debug, trace};

use super::error::MetadataError;
use super::types::{clean_text, TagPatch, TagSnapshot};
use crate::cover::{CoverImage, ImageKind};

fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .read_cover_art(true)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// Maps a lofty error onto the module's error kinds, reporting `path`.
pub(crate) fn map_lofty_error(path: &Path, err: LoftyError) -> MetadataError {
    match err.kind() {
        // Short reads mean a truncated container, not a filesystem fault.
        LoftyErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
            MetadataError::corrupt(path, err.to_string())
        }
        LoftyErrorKind::Io(io_err) => {
            MetadataError::from_write_io(path, io::Error::new(io_err.kind(), io_err.to_string()))
        }
        LoftyErrorKind::UnknownFormat | LoftyErrorKind::UnsupportedTag => {
            MetadataError::unsupported(path)
        }
        _ => MetadataError::corrupt(path, err.to_string()),
    }
}

/// Parses `source`, attributing errors to `reported`.
fn open_as(source: &Path, reported: &Path) -> Result<TaggedFile, MetadataError> {
    Probe::open(source)
        .map_err(|e| map_lofty_error(reported, e))?
        .options(parse_options())
        .read()
        .map_err(|e| map_lofty_error(reported, e))
}

pub(crate) fn open(path: &Path) -> Result<TaggedFile, MetadataError> {
    open_as(path, path)
}

/// Front cover, or the first picture of any type.
fn cover_from_tag(tag: &Tag) -> Option<CoverImage> {
    let pictures = tag.pictures();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .filter(|p| !p.data().is_empty())
        .map(|p| CoverImage::from_bytes(p.data().to_vec()))
}

pub(crate) fn snapshot_from_tag(tag: &Tag) -> TagSnapshot {
    TagSnapshot {
        track_number: tag.track().filter(|n| *n > 0),
        title: tag.title().as_deref().and_then(clean_text),
        album: tag.album().as_deref().and_then(clean_text),
        cover: cover_from_tag(tag),
    }
}

/// Reads tags in `preference` order, filling gaps from later tag types.
/// An empty preference list means the file's primary tag, then any tag.
pub(crate) fn read_snapshot(path: &Path, preference: &[TagType]) -> Result<TagSnapshot, MetadataError> {
    let tagged = open(path)?;
    let mut snapshot = TagSnapshot::default();

    if preference.is_empty() {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            snapshot = snapshot_from_tag(tag);
        }
    } else {
        for tag_type in preference {
            if let Some(tag) = tagged.tag(*tag_type) {
                snapshot.fill_missing_from(snapshot_from_tag(tag));
            }
        }
    }

    trace!(path = %path.display(), ?snapshot, "Read tags");
    Ok(snapshot)
}

fn mime_for(kind: ImageKind) -> Option<MimeType> {
    match kind {
        ImageKind::Jpeg => Some(MimeType::Jpeg),
        ImageKind::Png => Some(MimeType::Png),
        ImageKind::Gif => Some(MimeType::Gif),
        ImageKind::Bmp => Some(MimeType::Bmp),
        ImageKind::Webp => Some(MimeType::Unknown(ImageKind::Webp.mime_type().to_string())),
        ImageKind::Unknown => None,
    }
}

/// Drops the picture(s) [`cover_from_tag`] would read, so a written cover
/// replaces its source instead of sitting next to it.
fn remove_source_cover(tag: &mut Tag) {
    // `covr` atoms carry no picture type; every one of them reads as `Other`.
    if tag.tag_type() == TagType::Mp4Ilst {
        while !tag.pictures().is_empty() {
            tag.remove_picture(0);
        }
        return;
    }

    if tag.pictures().iter().any(|p| p.pic_type() == PictureType::CoverFront) {
        tag.remove_picture_type(PictureType::CoverFront);
    } else if !tag.pictures().is_empty() {
        tag.remove_picture(0);
    }
}

pub(crate) fn apply_patch(tag: &mut Tag, patch: &TagPatch) {
    if let Some(track) = patch.track_number {
        tag.set_track(track);
    }
    if let Some(title) = &patch.title {
        tag.set_title(title.clone());
    }
    if let Some(album) = &patch.album {
        tag.set_album(album.clone());
    }
    if let Some(cover) = &patch.cover {
        remove_source_cover(tag);
        let mut builder = Picture::unchecked(cover.data.clone()).pic_type(PictureType::CoverFront);
        if let Some(mime) = mime_for(cover.kind) {
            builder = builder.mime_type(mime);
        }
        tag.push_picture(builder.build());
    }
}

/// Writes `patch` into `path` via a sibling temp file and an atomic rename.
///
/// `tag_type` of `None` targets the file's primary tag type. The original is
/// never opened for writing; a crash leaves either the old file or the new
/// one.
pub(crate) fn write_atomic(
    path: &Path,
    tag_type: Option<TagType>,
    patch: &TagPatch,
) -> Result<(), MetadataError> {
    if patch.is_empty() {
        return Ok(());
    }

    let metadata = fs::metadata(path)?;
    if metadata.permissions().readonly() {
        return Err(MetadataError::WriteDenied {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let suffix = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix(".coverkit-")
        .suffix(&suffix)
        .tempfile_in(parent)
        .map_err(|e| MetadataError::from_write_io(path, e))?;

    // Also carries the original permissions over to the staged copy.
    fs::copy(path, staged.path()).map_err(|e| MetadataError::from_write_io(path, e))?;

    let mut tagged = open_as(staged.path(), path)?;
    let tag_type = tag_type.unwrap_or_else(|| tagged.primary_tag_type());

    if tagged.tag(tag_type).is_none() {
        tagged.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged
        .tag_mut(tag_type)
        .ok_or_else(|| MetadataError::unsupported(path))?;

    apply_patch(tag, patch);
    tag.save_to_path(staged.path(), WriteOptions::default())
        .map_err(|e| map_lofty_error(path, e))?;

    staged
        .as_file()
        .sync_all()
        .map_err(|e| MetadataError::from_write_io(path, e))?;
    staged
        .persist(path)
        .map_err(|e| MetadataError::from_write_io(path, e.error))?;

    debug!(path = %path.display(), ?tag_type, "Wrote tags");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_apply_patch_replaces_front_covers() {
        let mut tag = Tag::new(TagType::Id3v2);
        for pic_type in [PictureType::CoverFront, PictureType::CoverFront, PictureType::CoverBack] {
            tag.push_picture(
                Picture::unchecked(fixtures::png_bytes(4, 4))
                    .pic_type(pic_type)
                    .mime_type(MimeType::Png)
                    .build(),
            );
        }

        let cover = CoverImage::from_bytes(fixtures::jpeg_bytes(8, 8));
        apply_patch(&mut tag, &TagPatch::cover(cover.clone()));

        let fronts: Vec<_> = tag
            .pictures()
            .iter()
            .filter(|p| p.pic_type() == PictureType::CoverFront)
            .collect();
        assert_eq!(fronts.len(), 1);
        assert_eq!(fronts[0].data(), cover.data.as_slice());
        assert_eq!(tag.pictures().len(), 2);
    }

    #[test]
    fn test_apply_patch_replaces_untyped_fallback_cover() {
        let mut tag = Tag::new(TagType::VorbisComments);
        for pic_type in [PictureType::Other, PictureType::Artist] {
            tag.push_picture(Picture::unchecked(fixtures::png_bytes(4, 4)).pic_type(pic_type).build());
        }

        let cover = CoverImage::from_bytes(fixtures::jpeg_bytes(8, 8));
        apply_patch(&mut tag, &TagPatch::cover(cover.clone()));

        let types: Vec<_> = tag.pictures().iter().map(|p| p.pic_type()).collect();
        assert_eq!(types, vec![PictureType::Artist, PictureType::CoverFront]);
        assert_eq!(snapshot_from_tag(&tag).cover.unwrap().data, cover.data);
    }

    #[test]
    fn test_apply_patch_clears_every_mp4_cover() {
        let mut tag = Tag::new(TagType::Mp4Ilst);
        for _ in 0..2 {
            tag.push_picture(
                Picture::unchecked(fixtures::png_bytes(4, 4))
                    .pic_type(PictureType::Other)
                    .mime_type(MimeType::Png)
                    .build(),
            );
        }

        let cover = CoverImage::from_bytes(fixtures::jpeg_bytes(8, 8));
        apply_patch(&mut tag, &TagPatch::cover(cover.clone()));

        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].data(), cover.data.as_slice());
    }

    #[test]
    fn test_snapshot_ignores_zero_track_and_blank_text() {
        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_track(0);
        tag.set_title("   ".to_string());
        tag.set_album("Album".to_string());

        let snapshot = snapshot_from_tag(&tag);
        assert_eq!(snapshot.track_number, None);
        assert_eq!(snapshot.title, None);
        assert_eq!(snapshot.album.as_deref(), Some("Album"));
    }

    #[test]
    fn test_snapshot_prefers_front_cover() {
        let mut tag = Tag::new(TagType::Id3v2);
        let back = fixtures::png_bytes(2, 2);
        let front = fixtures::jpeg_bytes(3, 3);
        tag.push_picture(Picture::unchecked(back).pic_type(PictureType::CoverBack).build());
        tag.push_picture(
            Picture::unchecked(front.clone())
                .pic_type(PictureType::CoverFront)
                .build(),
        );

        let snapshot = snapshot_from_tag(&tag);
        assert_eq!(snapshot.cover.unwrap().data, front);
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        fs::write(&path, fixtures::mp3_bytes()).unwrap();

        let patch = TagPatch {
            title: Some("Written".to_string()),
            ..Default::default()
        };
        write_atomic(&path, Some(TagType::Id3v2), &patch).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("song.mp3")]);

        let snapshot = read_snapshot(&path, &[TagType::Id3v2]).unwrap();
        assert_eq!(snapshot.title.as_deref(), Some("Written"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_read_only_is_denied() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("locked.mp3");
        fs::write(&path, fixtures::mp3_bytes()).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let before = fs::read(&path).unwrap();
        let result = write_atomic(&path, None, &TagPatch::cover(CoverImage::from_bytes(vec![1])));
        assert!(matches!(result, Err(MetadataError::WriteDenied { .. })));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.flac");
        fs::write(&path, b"this is not a flac stream at all").unwrap();

        let result = read_snapshot(&path, &[]);
        assert!(matches!(
            result,
            Err(MetadataError::CorruptContainer { .. }) | Err(MetadataError::UnsupportedFormat { .. })
        ));
    }
}
