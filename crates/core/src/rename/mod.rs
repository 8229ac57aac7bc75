//! File and folder renaming.
//!
//! The [`RenamePlanner`] turns tags into a target name and resolves
//! collisions with `" (2)"`, `" (3)"`, ... suffixes. The mover functions
//! apply a plan without ever replacing an existing entry.

mod config;
mod error;
mod mover;
mod planner;
mod sanitize;

pub use config::RenameConfig;
pub use error::RenameError;
pub use mover::{apply_file_plan, apply_folder_plan};
pub use planner::{RenamePlan, RenamePlanner};
pub use sanitize::{sanitize_component, strip_track_prefix};
