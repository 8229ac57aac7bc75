//! Pre-mutation backups.
//!
//! Backups sit next to the original as `<stem>_backup.<ext>`, are written
//! through a temporary file and committed without overwriting, and are
//! never replaced once they exist.

mod config;
mod error;
mod manager;

pub use config::BackupConfig;
pub use error::BackupError;
pub use manager::{BackupManager, BackupOutcome};
