//! Configuration for the cover module.

use serde::{Deserialize, Serialize};

/// Target format for normalized cover art.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverConfig {
    /// Target width in pixels.
    #[serde(default = "default_size")]
    pub width: u32,

    /// Target height in pixels.
    #[serde(default = "default_size")]
    pub height: u32,

    /// JPEG quality (1-100).
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Whether to pick up `cover.jpg` and friends when nothing is embedded.
    #[serde(default = "default_true")]
    pub use_sidecar: bool,
}

fn default_size() -> u32 {
    600
}

fn default_quality() -> u8 {
    90
}

fn default_true() -> bool {
    true
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            quality: default_quality(),
            use_sidecar: true,
        }
    }
}

impl CoverConfig {
    /// Sets the target size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Enables or disables sidecar lookup.
    pub fn with_sidecar(mut self, enabled: bool) -> Self {
        self.use_sidecar = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoverConfig::default();
        assert_eq!(config.width, 600);
        assert_eq!(config.height, 600);
        assert_eq!(config.quality, 90);
        assert!(config.use_sidecar);
    }

    #[test]
    fn test_config_builder() {
        let config = CoverConfig::default()
            .with_size(300, 300)
            .with_quality(75)
            .with_sidecar(false);
        assert_eq!(config.width, 300);
        assert_eq!(config.quality, 75);
        assert!(!config.use_sidecar);
    }
}
