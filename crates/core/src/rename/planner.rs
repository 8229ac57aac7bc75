//! Target name computation for files and album folders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::config::RenameConfig;
use super::error::RenameError;
use super::sanitize::{sanitize_component, strip_track_prefix};
use crate::metadata::TagSnapshot;

/// A computed rename. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    original: PathBuf,
    proposed: PathBuf,
    suffix: Option<u32>,
    #[serde(skip)]
    base: String,
    #[serde(skip)]
    extension: Option<String>,
}

impl RenamePlan {
    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn proposed(&self) -> &Path {
        &self.proposed
    }

    /// Collision suffix, starting at 2. `None` for the plain name.
    pub fn suffix(&self) -> Option<u32> {
        self.suffix
    }

    pub fn is_noop(&self) -> bool {
        self.proposed == self.original
    }
}

/// Computes target names. Never touches the filesystem beyond existence
/// checks.
#[derive(Debug, Clone, Default)]
pub struct RenamePlanner {
    config: RenameConfig,
}

impl RenamePlanner {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Plans `"<NN> - <title>.<ext>"` for an audio file.
    pub fn plan_file(&self, snapshot: &TagSnapshot, current: &Path) -> Result<RenamePlan, RenameError> {
        let extension = current
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let budget = self.base_budget(extension.as_deref());
        let base = self
            .file_base_name(snapshot, current, budget)
            .ok_or_else(|| RenameError::InsufficientMetadata {
                path: current.to_path_buf(),
            })?;

        self.resolve(current, base, extension, None)
    }

    /// Plans a folder named after `album`, next to `current_dir`.
    pub fn plan_folder(&self, album: &str, current_dir: &Path) -> Result<RenamePlan, RenameError> {
        let base = sanitize_component(album, self.base_budget(None)).ok_or_else(|| {
            RenameError::InsufficientMetadata {
                path: current_dir.to_path_buf(),
            }
        })?;
        self.resolve(current_dir, base, None, None)
    }

    /// Re-plans with the next free suffix after `plan`'s.
    pub fn advance(&self, plan: &RenamePlan) -> Result<RenamePlan, RenameError> {
        let next = plan.suffix.map_or(2, |s| s + 1);
        self.resolve(
            &plan.original,
            plan.base.clone(),
            plan.extension.clone(),
            Some(next),
        )
    }

    /// Bytes left for a base name once the extension and the widest
    /// collision suffix are set aside.
    fn base_budget(&self, extension: Option<&str>) -> usize {
        let suffix = format!(" ({})", self.config.max_collision_attempts).len();
        let extension = extension.map_or(0, |e| e.len() + 1);
        self.config
            .max_name_len
            .saturating_sub(suffix + extension)
    }

    /// File name without extension, at most `budget` bytes, or `None` when
    /// track and title are both missing.
    fn file_base_name(&self, snapshot: &TagSnapshot, current: &Path, budget: usize) -> Option<String> {
        let prefix = snapshot
            .track_number
            .map(|track| format!("{:02} - ", track))
            .unwrap_or_default();
        let title_budget = budget.saturating_sub(prefix.len());

        let title = snapshot
            .title
            .as_deref()
            .and_then(|t| sanitize_component(t, title_budget));
        let title = match (snapshot.track_number, title) {
            (_, Some(title)) => title,
            (Some(_), None) => {
                let stem = current.file_stem()?.to_str()?;
                sanitize_component(strip_track_prefix(stem), title_budget)?
            }
            (None, None) => return None,
        };
        Some(format!("{}{}", prefix, title))
    }

    fn candidate(&self, original: &Path, base: &str, extension: Option<&str>, suffix: Option<u32>) -> PathBuf {
        let mut name = match suffix {
            Some(n) => format!("{} ({})", base, n),
            None => base.to_string(),
        };
        if let Some(ext) = extension {
            name.push('.');
            name.push_str(ext);
        }
        match original.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    fn resolve(
        &self,
        original: &Path,
        base: String,
        extension: Option<String>,
        start: Option<u32>,
    ) -> Result<RenamePlan, RenameError> {
        let max = self.config.max_collision_attempts;
        let mut suffix = start;

        loop {
            if suffix.is_some_and(|n| n > max) {
                return Err(RenameError::CollisionUnresolvable {
                    path: original.to_path_buf(),
                    attempts: max,
                });
            }

            let proposed = self.candidate(original, &base, extension.as_deref(), suffix);
            if proposed == original || !proposed.exists() || same_entry(&proposed, original) {
                if suffix.is_some() {
                    debug!(
                        original = %original.display(),
                        proposed = %proposed.display(),
                        "Resolved name collision"
                    );
                }
                return Ok(RenamePlan {
                    original: original.to_path_buf(),
                    proposed,
                    suffix,
                    base,
                    extension,
                });
            }

            suffix = Some(suffix.map_or(2, |n| n + 1));
        }
    }
}

/// Whether two paths name the same entry, e.g. differing only in case on a
/// case-insensitive filesystem.
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
