//! Configuration for the rename module.

use serde::{Deserialize, Serialize};

/// Configuration for file and folder renaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Highest collision suffix tried, counting the unsuffixed name as 1.
    #[serde(default = "default_max_collision_attempts")]
    pub max_collision_attempts: u32,

    /// Maximum length in bytes of a final file or folder name, collision
    /// suffix and extension included. Filesystems cap names at 255 bytes.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Copy then delete when a rename crosses filesystems.
    #[serde(default)]
    pub copy_fallback: bool,
}

fn default_max_collision_attempts() -> u32 {
    100
}

fn default_max_name_len() -> usize {
    255
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            max_collision_attempts: default_max_collision_attempts(),
            max_name_len: default_max_name_len(),
            copy_fallback: false,
        }
    }
}

impl RenameConfig {
    pub fn with_max_collision_attempts(mut self, attempts: u32) -> Self {
        self.max_collision_attempts = attempts;
        self
    }

    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    pub fn with_copy_fallback(mut self, enabled: bool) -> Self {
        self.copy_fallback = enabled;
        self
    }
}
