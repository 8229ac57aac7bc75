//! Configuration for the backup module.

use serde::{Deserialize, Serialize};

/// Configuration for pre-mutation backups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Inserted between the stem and the extension.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Compare SHA-256 of the copy against the original before committing.
    #[serde(default = "default_true")]
    pub verify: bool,
}

fn default_suffix() -> String {
    "_backup".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            verify: true,
        }
    }
}

impl BackupConfig {
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
