//! The real file job executor.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::JobError;
use super::types::{CoverChange, FileJob, JobChanges, JobResult, SkipReason};
use crate::backup::{BackupConfig, BackupManager};
use crate::config::RunConfig;
use crate::cover::{find_sidecar_cover, CoverConfig, CoverImage, CoverNormalizer, CoverOrigin};
use crate::metadata::{AdapterRegistry, TagPatch, TagSnapshot};
use crate::pool::JobExecutor;
use crate::rename::{apply_file_plan, RenameConfig, RenameError, RenamePlan, RenamePlanner};

/// Cover work decided before anything is written.
enum CoverWork {
    Keep(CoverOrigin),
    Write {
        data: Vec<u8>,
        change: CoverChange,
        origin: CoverOrigin,
    },
    Missing,
}

impl CoverWork {
    fn change(&self) -> CoverChange {
        match self {
            Self::Keep(_) => CoverChange::Unchanged,
            Self::Write { change, .. } => *change,
            Self::Missing => CoverChange::Missing,
        }
    }
}

struct Inner {
    registry: AdapterRegistry,
    normalizer: CoverNormalizer,
    planner: RenamePlanner,
    backups: BackupManager,
    use_sidecar: bool,
    /// Names handed out to dry-run jobs; nothing is on disk to collide with.
    planned: Mutex<HashSet<PathBuf>>,
}

/// Reads tags, normalizes covers, backs up, writes and renames one file.
///
/// The tag and image work is synchronous and runs on tokio's blocking pool.
#[derive(Clone)]
pub struct FileProcessor {
    inner: Arc<Inner>,
}

impl FileProcessor {
    pub fn new(
        registry: AdapterRegistry,
        cover: CoverConfig,
        rename: RenameConfig,
        backup: BackupConfig,
    ) -> Self {
        let use_sidecar = cover.use_sidecar;
        Self {
            inner: Arc::new(Inner {
                registry,
                normalizer: CoverNormalizer::new(cover),
                planner: RenamePlanner::new(rename),
                backups: BackupManager::new(backup),
                use_sidecar,
                planned: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            AdapterRegistry::with_defaults(),
            config.cover.clone(),
            config.rename.clone(),
            config.backups.clone(),
        )
    }

    /// Runs a job on the current thread.
    pub fn process(&self, job: &FileJob) -> Result<JobResult, JobError> {
        self.inner.process(job)
    }
}

impl Inner {
    fn process(&self, job: &FileJob) -> Result<JobResult, JobError> {
        let path = job.path();
        if self.backups.is_backup_path(path) {
            warn!(path = %path.display(), "Backup-named file without its original, leaving it alone");
            return Ok(JobResult::skipped(job.id, path.to_path_buf(), SkipReason::UnpairedBackup));
        }

        let adapter = self.registry.for_path(path)?;
        let snapshot = adapter.read(path)?;
        debug!(
            job = %job.id,
            path = %path.display(),
            adapter = adapter.name(),
            track = ?snapshot.track_number,
            title = ?snapshot.title,
            has_cover = snapshot.cover.is_some(),
            "Read tags"
        );

        let cover_work = if job.operation.embeds() {
            Some(self.plan_cover(path, &snapshot)?)
        } else {
            None
        };

        let rename_plan = if job.operation.renames() {
            match self.planner.plan_file(&snapshot, path) {
                Ok(plan) => Some(plan),
                Err(RenameError::InsufficientMetadata { .. }) => None,
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        let cover_missing = matches!(cover_work, None | Some(CoverWork::Missing));
        let name_missing = job.operation.renames() && rename_plan.is_none();
        match (job.operation.embeds(), job.operation.renames()) {
            (true, false) if cover_missing => {
                return Ok(JobResult::skipped(job.id, path.to_path_buf(), SkipReason::NoCoverArt));
            }
            (false, true) if name_missing => {
                return Ok(JobResult::skipped(
                    job.id,
                    path.to_path_buf(),
                    SkipReason::InsufficientMetadata,
                ));
            }
            (true, true) if cover_missing && name_missing => {
                return Ok(JobResult::skipped(job.id, path.to_path_buf(), SkipReason::NoCoverArt));
            }
            _ => {}
        }

        let mut changes = JobChanges::new(job.dry_run);
        if let Some(work) = &cover_work {
            changes.cover = work.change();
            changes.cover_origin = match work {
                CoverWork::Keep(origin) | CoverWork::Write { origin, .. } => Some(origin.clone()),
                CoverWork::Missing => None,
            };
        }
        let rename_plan = rename_plan.filter(|plan| !plan.is_noop());
        let writes_cover = changes.cover.is_write();

        if job.dry_run {
            changes.renamed_to = match rename_plan {
                Some(plan) => Some(self.reserve_planned(plan)?.proposed().to_path_buf()),
                None => None,
            };
            debug!(job = %job.id, path = %path.display(), ?changes, "Dry run");
            return Ok(JobResult::success(job.id, path.to_path_buf(), changes));
        }

        if job.backup && (writes_cover || rename_plan.is_some()) {
            let outcome = self.backups.ensure_backup(path)?;
            changes.backup_path = Some(outcome.path);
        }

        if let Some(CoverWork::Write { data, .. }) = cover_work {
            adapter.write(path, &TagPatch::cover(CoverImage::from_bytes(data)))?;
            debug!(job = %job.id, path = %path.display(), cover = ?changes.cover, "Cover written");
        }

        let mut after_path = path.to_path_buf();
        if let Some(plan) = rename_plan {
            let applied = self.apply_rename(plan)?;
            after_path = applied.proposed().to_path_buf();
            changes.renamed_to = Some(after_path.clone());
        }

        if changes.is_modification() {
            info!(
                job = %job.id,
                path = %path.display(),
                cover = ?changes.cover,
                renamed_to = ?changes.renamed_to,
                "File updated"
            );
        }
        Ok(JobResult::success(job.id, path.to_path_buf(), changes).with_after_path(after_path))
    }

    fn plan_cover(&self, path: &Path, snapshot: &TagSnapshot) -> Result<CoverWork, JobError> {
        if let Some(embedded) = &snapshot.cover {
            if self.normalizer.is_normalized(embedded) {
                return Ok(CoverWork::Keep(CoverOrigin::Embedded));
            }
            let normalized = self.normalizer.normalize(&embedded.data)?;
            if !normalized.changed {
                return Ok(CoverWork::Keep(CoverOrigin::Embedded));
            }
            return Ok(CoverWork::Write {
                data: normalized.data,
                change: CoverChange::Replaced,
                origin: CoverOrigin::Embedded,
            });
        }

        if !self.use_sidecar {
            return Ok(CoverWork::Missing);
        }
        let Some(sidecar) = find_sidecar_cover(path) else {
            return Ok(CoverWork::Missing);
        };

        debug!(path = %path.display(), sidecar = %sidecar.display(), "Using sidecar cover");
        let raw = fs::read(&sidecar)?;
        let normalized = self.normalizer.normalize(&raw)?;
        Ok(CoverWork::Write {
            data: normalized.data,
            change: CoverChange::Embedded,
            origin: CoverOrigin::Sidecar { path: sidecar },
        })
    }

    /// Moves `plan` past names other dry-run jobs already claimed, then
    /// claims its own.
    fn reserve_planned(&self, mut plan: RenamePlan) -> Result<RenamePlan, JobError> {
        let mut planned = self
            .planned
            .lock()
            .map_err(|_| JobError::internal("planned name set poisoned"))?;
        while planned.contains(plan.proposed()) {
            plan = self.planner.advance(&plan)?;
        }
        planned.insert(plan.proposed().to_path_buf());
        Ok(plan)
    }

    fn apply_rename(&self, plan: RenamePlan) -> Result<RenamePlan, JobError> {
        Ok(apply_file_plan(&self.planner, plan)?)
    }
}

#[async_trait]
impl JobExecutor for FileProcessor {
    fn name(&self) -> &str {
        "file"
    }

    async fn execute(&self, job: FileJob) -> Result<JobResult, JobError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.process(&job))
            .await
            .map_err(|e| JobError::internal(format!("worker task failed: {}", e)))?
    }
}
