use std::path::PathBuf;

use clap::Parser;
use coverkit_core::{ConfigOverrides, RunMode};

/// Normalize embedded cover art and rename audio files from their tags.
#[derive(Parser, Debug)]
#[command(name = "coverkit", version)]
pub struct Args {
    /// Directory tree to process (may come from the config file instead)
    pub root: Option<PathBuf>,

    /// embed_only, rename_only, both or folders_only
    #[arg(long, short)]
    pub mode: Option<RunMode>,

    /// Compute every change but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Copy each file to <stem>_backup.<ext> before modifying it
    #[arg(long)]
    pub backup: bool,

    /// Maximum concurrent file jobs
    #[arg(long, short)]
    pub workers: Option<usize>,

    /// Log every job and enable debug output
    #[arg(long, short)]
    pub verbose: bool,

    /// Also rename album folders after processing files
    #[arg(long)]
    pub rename_folders: bool,

    /// TOML config file (defaults to $COVERKIT_CONFIG when set)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Flags only override lower layers when given.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: self.root.clone(),
            mode: self.mode,
            dry_run: self.dry_run.then_some(true),
            backup: self.backup.then_some(true),
            workers: self.workers,
            verbose: self.verbose.then_some(true),
            rename_folders: self.rename_folders.then_some(true),
        }
    }
}
