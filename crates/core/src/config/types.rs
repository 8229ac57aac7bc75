use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backup::BackupConfig;
use crate::cover::CoverConfig;
use crate::job::FileOperation;
use crate::rename::RenameConfig;

/// What a run does to the files under the root directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Normalize embedded cover art.
    #[default]
    EmbedOnly,
    /// Rename files from their tags.
    RenameOnly,
    /// Normalize cover art, then rename.
    Both,
    /// Rename album folders only.
    FoldersOnly,
}

impl RunMode {
    /// The per-file operation for this mode, if the mode touches files at all.
    pub fn file_operation(&self) -> Option<FileOperation> {
        match self {
            Self::EmbedOnly => Some(FileOperation::EmbedOnly),
            Self::RenameOnly => Some(FileOperation::RenameOnly),
            Self::Both => Some(FileOperation::Both),
            Self::FoldersOnly => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmbedOnly => "embed_only",
            Self::RenameOnly => "rename_only",
            Self::Both => "both",
            Self::FoldersOnly => "folders_only",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "embed_only" | "embed" => Ok(Self::EmbedOnly),
            "rename_only" | "rename" => Ok(Self::RenameOnly),
            "both" => Ok(Self::Both),
            "folders_only" | "folders" => Ok(Self::FoldersOnly),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// Root configuration for a single run.
///
/// Built once by the caller and passed by reference into the coordinator;
/// nothing in the core reads ambient state such as the working directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Directory tree to process.
    pub root: PathBuf,

    #[serde(default)]
    pub mode: RunMode,

    /// Read and compute everything, write nothing.
    #[serde(default)]
    pub dry_run: bool,

    /// Copy each file before its first mutation.
    #[serde(default)]
    pub backup: bool,

    /// Maximum concurrently executing file jobs.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Log every job outcome, not only failures.
    #[serde(default)]
    pub verbose: bool,

    /// Also rename album folders after the file phase.
    #[serde(default)]
    pub rename_folders: bool,

    #[serde(default)]
    pub cover: CoverConfig,

    #[serde(default)]
    pub rename: RenameConfig,

    #[serde(default)]
    pub backups: BackupConfig,
}

fn default_workers() -> usize {
    4
}

impl RunConfig {
    /// Creates a config for `root` with every other setting at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: RunMode::default(),
            dry_run: false,
            backup: false,
            workers: default_workers(),
            verbose: false,
            rename_folders: false,
            cover: CoverConfig::default(),
            rename: RenameConfig::default(),
            backups: BackupConfig::default(),
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_rename_folders(mut self, enabled: bool) -> Self {
        self.rename_folders = enabled;
        self
    }

    /// Whether the folder phase runs after the file phase.
    pub fn renames_folders(&self) -> bool {
        self.mode == RunMode::FoldersOnly || self.rename_folders
    }
}

/// Values supplied on the command line. `None` fields leave the file and
/// environment layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<RunMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename_folders: Option<bool>,
}
