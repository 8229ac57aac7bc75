//! Sibling backups of audio files.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::config::BackupConfig;
use super::error::BackupError;

/// Result of [`BackupManager::ensure_backup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupOutcome {
    pub path: PathBuf,
    /// False when a backup already existed and was left alone.
    pub created: bool,
}

/// Creates `<stem><suffix>.<ext>` copies next to originals.
#[derive(Debug, Clone, Default)]
pub struct BackupManager {
    config: BackupConfig,
}

impl BackupManager {
    pub fn new(config: BackupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Where the backup of `path` lives.
    pub fn backup_path(&self, path: &Path) -> Result<PathBuf, BackupError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| BackupError::InvalidPath {
                path: path.to_path_buf(),
            })?;

        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}{}.{}", stem, self.config.suffix, ext),
            None => format!("{}{}", stem, self.config.suffix),
        };
        Ok(path.with_file_name(name))
    }

    /// The file `path` would be a backup of, if its name carries the suffix.
    pub fn original_path(&self, path: &Path) -> Option<PathBuf> {
        let stem = path.file_stem()?.to_str()?;
        let original = stem.strip_suffix(self.config.suffix.as_str())?;
        if original.is_empty() {
            return None;
        }

        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", original, ext),
            None => original.to_string(),
        };
        Some(path.with_file_name(name))
    }

    /// Whether `path` is named like a backup made with this suffix.
    pub fn is_backup_path(&self, path: &Path) -> bool {
        self.original_path(path).is_some()
    }

    /// Whether `path` is a backup and its original still sits next to it.
    pub fn is_paired_backup(&self, path: &Path) -> bool {
        self.original_path(path).is_some_and(|original| original.is_file())
    }

    /// Makes sure a byte-exact backup of `path` exists.
    ///
    /// An existing backup is never overwritten, so the first backup of a file
    /// always holds its pre-tool content.
    pub fn ensure_backup(&self, path: &Path) -> Result<BackupOutcome, BackupError> {
        let backup = self.backup_path(path)?;
        if backup.exists() {
            debug!(backup = %backup.display(), "Backup already present");
            return Ok(BackupOutcome {
                path: backup,
                created: false,
            });
        }

        let parent = match backup.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".coverkit-backup-")
            .tempfile_in(parent)
            .map_err(|e| BackupError::copy_failed(path, e))?;

        fs::copy(path, staged.path()).map_err(|e| BackupError::copy_failed(path, e))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| BackupError::copy_failed(path, e))?;

        if self.config.verify {
            let expected = sha256_file(path).map_err(|e| BackupError::copy_failed(path, e))?;
            let actual =
                sha256_file(staged.path()).map_err(|e| BackupError::copy_failed(path, e))?;
            if expected != actual {
                return Err(BackupError::ChecksumMismatch {
                    path: path.to_path_buf(),
                    expected,
                    actual,
                });
            }
        }

        match staged.persist_noclobber(&backup) {
            Ok(_) => {
                info!(backup = %backup.display(), "Created backup");
                Ok(BackupOutcome {
                    path: backup,
                    created: true,
                })
            }
            // Lost a race with another writer of the same backup.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(BackupOutcome {
                path: backup,
                created: false,
            }),
            Err(e) => Err(BackupError::copy_failed(path, e.error)),
        }
    }
}

fn sha256_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
