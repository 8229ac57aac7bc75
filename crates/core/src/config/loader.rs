use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::ConfigOverrides, types::RunConfig, ConfigError};

/// Environment variable prefix. Nested keys use a double underscore,
/// e.g. `COVERKIT_COVER__QUALITY=85`.
const ENV_PREFIX: &str = "COVERKIT_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: RunConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from an optional file, the environment, and command
/// line overrides, in increasing order of precedence.
pub fn load_layered_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<RunConfig, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<RunConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
root = "/music"
mode = "rename_only"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.mode, RunMode::RenameOnly);
    }

    #[test]
    fn test_load_config_from_str_missing_root() {
        let result = load_config_from_str("workers = 2");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/coverkit.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
root = "/srv/music"
workers = 2

[cover]
quality = 80
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/music"));
        assert_eq!(config.workers, 2);
        assert_eq!(config.cover.quality, 80);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
root = "/srv/music"
workers = 2
dry_run = true
"#
        )
        .unwrap();

        let overrides = ConfigOverrides {
            root: Some(PathBuf::from("/elsewhere")),
            workers: Some(6),
            ..Default::default()
        };
        let config = load_layered_config(Some(temp_file.path()), &overrides).unwrap();
        assert_eq!(config.root, PathBuf::from("/elsewhere"));
        assert_eq!(config.workers, 6);
        // Not overridden, so the file value stays.
        assert!(config.dry_run);
    }

    #[test]
    fn test_overrides_without_file() {
        let overrides = ConfigOverrides {
            root: Some(PathBuf::from("/music")),
            mode: Some(RunMode::Both),
            ..Default::default()
        };
        let config = load_layered_config(None, &overrides).unwrap();
        assert_eq!(config.mode, RunMode::Both);
        assert_eq!(config.workers, 4);
    }
}
