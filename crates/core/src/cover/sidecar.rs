//! Sidecar cover discovery.
//!
//! Used when an audio file has nothing embedded. Priority:
//! 1. Image with the same stem as the audio file
//! 2. Common cover file names in the same directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Common cover art file stems, in priority order.
const COVER_STEMS: &[&str] = &["cover", "folder", "front", "albumart", "album", "artwork"];

/// Image extensions, in priority order.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Finds a sidecar image for `audio_path`, matching names case-insensitively.
pub fn find_sidecar_cover(audio_path: &Path) -> Option<PathBuf> {
    let parent = audio_path.parent()?;
    let entries = fs::read_dir(parent).ok()?;

    let images: HashMap<String, PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_lowercase();
            Some((name, e.path()))
        })
        .collect();

    let own_stem = audio_path.file_stem()?.to_str()?.to_lowercase();
    let stems = std::iter::once(own_stem.as_str()).chain(COVER_STEMS.iter().copied());

    for stem in stems {
        for ext in IMAGE_EXTENSIONS {
            if let Some(path) = images.get(&format!("{}.{}", stem, ext)) {
                return Some(path.clone());
            }
        }
    }

    None
}
