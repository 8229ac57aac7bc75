//! Album folder renaming phase.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::discovery::is_candidate;
use super::report::FolderResult;
use crate::backup::BackupManager;
use crate::job::{JobChanges, JobError, JobOutcome, SkipReason};
use crate::metadata::AdapterRegistry;
use crate::rename::{apply_folder_plan, RenamePlanner};

/// Immediate subdirectories of `root` that directly contain one of `files`,
/// sorted by path.
///
/// Deeper directories are never candidates: a disc folder such as
/// `Album/CD1` keeps its name even though its tracks are tagged "Album".
pub fn album_directories(root: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    let dirs: BTreeSet<PathBuf> = files
        .iter()
        .filter_map(|f| f.parent())
        .filter(|d| d.parent() == Some(root))
        .map(Path::to_path_buf)
        .collect();
    dirs.into_iter().collect()
}

/// Most frequent album; ties go to the lexicographically smallest name.
pub fn majority_album<I, S>(albums: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for album in albums {
        *counts.entry(album.into()).or_default() += 1;
    }

    // BTreeMap iterates in name order, so the first maximum wins ties.
    let mut best: Option<(String, usize)> = None;
    for (album, count) in counts {
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((album, count));
        }
    }
    best.map(|(album, _)| album)
}

/// Renames directories after the album of the audio files they hold.
pub struct FolderRenamer {
    registry: AdapterRegistry,
    planner: RenamePlanner,
    backups: BackupManager,
    dry_run: bool,
}

impl FolderRenamer {
    pub fn new(
        registry: AdapterRegistry,
        planner: RenamePlanner,
        backups: BackupManager,
        dry_run: bool,
    ) -> Self {
        Self {
            registry,
            planner,
            backups,
            dry_run,
        }
    }

    /// Album tags of the audio files directly inside `dir`.
    fn albums_in(&self, dir: &Path) -> Vec<String> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Cannot list folder");
                return Vec::new();
            }
        };

        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_candidate(p, &self.backups))
            .filter_map(|p| {
                let adapter = self.registry.for_path(&p).ok()?;
                match adapter.read(&p) {
                    Ok(snapshot) => snapshot.album,
                    Err(e) => {
                        debug!(path = %p.display(), error = %e, "Ignoring unreadable file");
                        None
                    }
                }
            })
            .collect()
    }

    /// Renames one folder.
    pub fn rename(&self, dir: &Path) -> FolderResult {
        let Some(album) = majority_album(self.albums_in(dir)) else {
            debug!(dir = %dir.display(), "No album tag, skipping folder");
            return FolderResult {
                path: dir.to_path_buf(),
                outcome: JobOutcome::Skipped(SkipReason::InsufficientMetadata),
                after_path: dir.to_path_buf(),
            };
        };

        match self.rename_to(dir, &album) {
            Ok((changes, after_path)) => FolderResult {
                path: dir.to_path_buf(),
                outcome: JobOutcome::Success(changes),
                after_path,
            },
            Err(e) => {
                warn!(dir = %dir.display(), kind = %e.kind(), "Folder rename failed: {}", e);
                FolderResult {
                    path: dir.to_path_buf(),
                    outcome: JobOutcome::Failed(e.to_failure()),
                    after_path: dir.to_path_buf(),
                }
            }
        }
    }

    fn rename_to(&self, dir: &Path, album: &str) -> Result<(JobChanges, PathBuf), JobError> {
        let mut changes = JobChanges::new(self.dry_run);
        let plan = self.planner.plan_folder(album, dir)?;
        if plan.is_noop() {
            return Ok((changes, dir.to_path_buf()));
        }

        if self.dry_run {
            changes.renamed_to = Some(plan.proposed().to_path_buf());
            return Ok((changes, dir.to_path_buf()));
        }

        let applied = apply_folder_plan(&self.planner, plan)?;
        let after = applied.proposed().to_path_buf();
        info!(from = %dir.display(), to = %after.display(), "Folder renamed");
        changes.renamed_to = Some(after.clone());
        Ok((changes, after))
    }
}
