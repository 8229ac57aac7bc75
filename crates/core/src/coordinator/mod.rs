//! Run orchestration: discovery, the file phase on the worker pool, the
//! sequential folder phase, and the final report.

mod discovery;
mod folders;
mod report;
mod runner;

pub use discovery::discover_audio_files;
pub use folders::{album_directories, majority_album, FolderRenamer};
pub use report::{FailureEntry, FolderResult, RunReport};
pub use runner::{RunCoordinator, RunError};
