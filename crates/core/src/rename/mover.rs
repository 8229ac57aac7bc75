//! Applies rename plans without clobbering existing entries.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::error::RenameError;
use super::planner::{same_entry, RenamePlan, RenamePlanner};

/// EXDEV on Linux and macOS.
const EXDEV: i32 = 18;

fn is_cross_device(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(EXDEV)
}

/// Moves a file to `plan.proposed()`, advancing the suffix whenever another
/// job claimed the name first. Returns the plan that was actually applied.
pub fn apply_file_plan(planner: &RenamePlanner, plan: RenamePlan) -> Result<RenamePlan, RenameError> {
    apply_with(planner, plan, |from, to| {
        move_file_no_clobber(from, to, planner.config().copy_fallback)
    })
}

/// Renames a directory to `plan.proposed()`.
pub fn apply_folder_plan(planner: &RenamePlanner, plan: RenamePlan) -> Result<RenamePlan, RenameError> {
    apply_with(planner, plan, move_dir_no_clobber)
}

fn apply_with<F>(planner: &RenamePlanner, mut plan: RenamePlan, mover: F) -> Result<RenamePlan, RenameError>
where
    F: Fn(&Path, &Path) -> Result<(), RenameError>,
{
    loop {
        if plan.is_noop() {
            return Ok(plan);
        }

        match mover(plan.original(), plan.proposed()) {
            Ok(()) => {
                debug!(
                    from = %plan.original().display(),
                    to = %plan.proposed().display(),
                    "Renamed"
                );
                return Ok(plan);
            }
            Err(e) if e.is_collision() => {
                debug!(target = %plan.proposed().display(), "Name taken, trying next suffix");
                plan = planner.advance(&plan)?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Hard link then unlink, so an existing target is never replaced.
fn move_file_no_clobber(from: &Path, to: &Path, copy_fallback: bool) -> Result<(), RenameError> {
    // Case-only rename of the same file: the link would collide with itself.
    if same_entry(from, to) {
        return fs::rename(from, to)
            .map_err(|e| RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e));
    }

    match fs::hard_link(from, to) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(RenameError::TargetExists {
            path: to.to_path_buf(),
        }),
        Err(e) if is_cross_device(&e) => {
            if copy_fallback {
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    "Rename crosses filesystems, copying instead"
                );
                copy_then_remove(from, to)
            } else {
                Err(RenameError::CrossVolume {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                })
            }
        }
        Err(e) => {
            // Filesystems without hard links (FAT, some network mounts).
            debug!(error = %e, "Hard link unavailable, falling back to rename");
            if to.exists() {
                return Err(RenameError::TargetExists {
                    path: to.to_path_buf(),
                });
            }
            fs::rename(from, to).map_err(|e| {
                if is_cross_device(&e) {
                    RenameError::CrossVolume {
                        from: from.to_path_buf(),
                        to: to.to_path_buf(),
                    }
                } else {
                    RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e)
                }
            })
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<(), RenameError> {
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                RenameError::TargetExists {
                    path: to.to_path_buf(),
                }
            } else {
                RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e)
            }
        })?;

    let copied = fs::File::open(from)
        .and_then(|mut source| io::copy(&mut source, &mut target))
        .and_then(|_| target.sync_all());
    if let Err(e) = copied {
        let _ = fs::remove_file(to);
        return Err(RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e));
    }

    if let Ok(meta) = fs::metadata(from) {
        let _ = fs::set_permissions(to, meta.permissions());
    }
    fs::remove_file(from)
        .map_err(|e| RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e))
}

fn move_dir_no_clobber(from: &Path, to: &Path) -> Result<(), RenameError> {
    if to.exists() && !same_entry(from, to) {
        return Err(RenameError::TargetExists {
            path: to.to_path_buf(),
        });
    }
    fs::rename(from, to).map_err(|e| {
        if is_cross_device(&e) {
            RenameError::CrossVolume {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            }
        } else {
            RenameError::move_failed(from.to_path_buf(), to.to_path_buf(), e)
        }
    })
}
