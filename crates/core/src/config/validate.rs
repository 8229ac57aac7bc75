use super::{types::RunConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Root exists and is a directory
/// - Worker count is positive
/// - Cover target size and JPEG quality are usable
/// - Backup suffix is not empty
pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if !config.root.exists() {
        return Err(ConfigError::ValidationError(format!(
            "root directory does not exist: {}",
            config.root.display()
        )));
    }
    if !config.root.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "root is not a directory: {}",
            config.root.display()
        )));
    }

    if config.workers == 0 {
        return Err(ConfigError::ValidationError(
            "workers must be at least 1".to_string(),
        ));
    }

    if config.cover.width == 0 || config.cover.height == 0 {
        return Err(ConfigError::ValidationError(
            "cover.width and cover.height must be positive".to_string(),
        ));
    }
    if !(1..=100).contains(&config.cover.quality) {
        return Err(ConfigError::ValidationError(
            "cover.quality must be between 1 and 100".to_string(),
        ));
    }

    if config.rename.max_collision_attempts < 2 {
        return Err(ConfigError::ValidationError(
            "rename.max_collision_attempts must be at least 2".to_string(),
        ));
    }

    if !(32..=255).contains(&config.rename.max_name_len) {
        return Err(ConfigError::ValidationError(
            "rename.max_name_len must be between 32 and 255 bytes".to_string(),
        ));
    }

    if config.backups.suffix.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "backups.suffix cannot be empty".to_string(),
        ));
    }

    Ok(())
}
