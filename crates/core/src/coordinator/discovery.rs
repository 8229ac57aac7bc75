//! Recursive discovery of audio files.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::backup::BackupManager;
use crate::metadata::{AudioFile, ContainerFormat};

/// Prefix of the staging files written next to originals.
const STAGING_PREFIX: &str = ".coverkit-";

/// Finds every audio file under `root`, sorted by path.
///
/// Symlinks are not followed. Backups whose original sits next to them and
/// leftover staging files are never returned, so each path yields at most
/// one job.
pub fn discover_audio_files(root: &Path, backups: &BackupManager) -> Vec<AudioFile> {
    let mut files: Vec<AudioFile> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_candidate(p, backups))
        .map(AudioFile::new)
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), count = files.len(), "Discovered audio files");
    files
}

/// Whether a single path would be picked up by discovery.
pub(crate) fn is_candidate(path: &Path, backups: &BackupManager) -> bool {
    let staging = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(STAGING_PREFIX));

    ContainerFormat::is_discoverable(path) && !staging && !backups.is_paired_backup(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_recursively_sorted() {
        let temp = TempDir::new().unwrap();
        let disc = temp.path().join("Album").join("CD2");
        fs::create_dir_all(&disc).unwrap();
        fs::write(temp.path().join("b.flac"), b"x").unwrap();
        fs::write(temp.path().join("a.MP3"), b"x").unwrap();
        fs::write(disc.join("c.opus"), b"x").unwrap();
        fs::write(disc.join("cover.jpg"), b"x").unwrap();
        fs::write(disc.join("notes.txt"), b"x").unwrap();

        let files = discover_audio_files(temp.path(), &BackupManager::default());
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("Album/CD2/c.opus").to_path_buf(),
                Path::new("a.MP3").to_path_buf(),
                Path::new("b.flac").to_path_buf(),
            ]
        );
        assert_eq!(files[0].format, ContainerFormat::Ogg);
    }

    #[test]
    fn test_skips_backups_and_staging_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("song.mp3"), b"x").unwrap();
        fs::write(temp.path().join("song_backup.mp3"), b"x").unwrap();
        fs::write(temp.path().join(".coverkit-a1b2.mp3"), b"x").unwrap();

        let files = discover_audio_files(temp.path(), &BackupManager::default());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, temp.path().join("song.mp3"));
    }

    #[test]
    fn test_lone_backup_named_track_is_discovered() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Song_backup.mp3"), b"x").unwrap();

        let files = discover_audio_files(temp.path(), &BackupManager::default());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, temp.path().join("Song_backup.mp3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("elsewhere.mp3"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let files = discover_audio_files(temp.path(), &BackupManager::default());
        assert!(files.is_empty());
    }
}
