//! Shared harness for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use coverkit_core::{
    metadata::{AdapterRegistry, TagSnapshot},
    testing::fixtures,
    CoverImage, RunConfig, RunCoordinator, RunMode, RunReport, TagPatch,
};

/// A temporary music library.
pub struct Library {
    pub dir: TempDir,
}

impl Library {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Writes a tagged MP3, creating parent directories.
    pub fn mp3(
        &self,
        relative: &str,
        track: Option<u32>,
        title: Option<&str>,
        album: Option<&str>,
        cover: Option<CoverImage>,
    ) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fixtures::write_tagged_mp3(&path, track, title, album, cover).expect("Failed to write mp3");
        path
    }

    /// Writes `bytes` and tags them with `patch`.
    pub fn tagged(&self, relative: &str, bytes: Vec<u8>, patch: TagPatch) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fixtures::write_tagged(&path, bytes, patch).expect("Failed to write tagged file");
        path
    }

    /// Writes a FLAC carrying `patch`.
    pub fn flac(&self, relative: &str, patch: TagPatch) -> PathBuf {
        self.tagged(relative, fixtures::flac_bytes(), patch)
    }

    pub fn write(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    pub fn config(&self, mode: RunMode) -> RunConfig {
        RunConfig::new(self.root()).with_mode(mode)
    }

    pub async fn run(&self, config: RunConfig) -> RunReport {
        RunCoordinator::new(config)
            .execute()
            .await
            .expect("Run failed")
    }

    /// Every file under the root with its bytes, sorted by path.
    pub fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = walk(self.root())
            .into_iter()
            .map(|p| {
                let bytes = fs::read(&p).expect("Failed to read file");
                (p, bytes)
            })
            .collect();
        files.sort();
        files
    }

    pub fn file_names(&self, relative_dir: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative_dir))
            .expect("Failed to list dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).expect("Failed to list dir") {
        let path = entry.expect("entry").path();
        if path.is_dir() {
            out.extend(walk(&path));
        } else {
            out.push(path);
        }
    }
    out
}

pub fn read_tags(path: &Path) -> TagSnapshot {
    AdapterRegistry::with_defaults()
        .for_path(path)
        .expect("No adapter")
        .read(path)
        .expect("Failed to read tags")
}
