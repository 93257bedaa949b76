//! Runtime configuration I/O operations.
//!
//! System directory detection and config file resolution. Kept apart from
//! `config.rs` so the config types stay free of filesystem lookups.

use crate::config::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Directories the tool reads from
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Config directory for user configuration
    /// e.g., ~/.config/treepick on Linux, ~/Library/Application Support/treepick on macOS
    pub config_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("treepick");

        Ok(Self { config_dir })
    }

    /// Context rooted at an arbitrary directory (for tests)
    pub fn for_testing(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
        }
    }

    /// Path of the user config file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

/// Resolve the effective configuration.
///
/// An explicit `--config` file must exist and wins outright. Otherwise the
/// user config file is used when present, and built-in defaults when not.
pub fn resolve_config(
    dir_context: Option<&DirectoryContext>,
    explicit: Option<&Path>,
) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        tracing::debug!("Loading config from {:?}", path);
        return Config::load_from_file(path);
    }

    if let Some(context) = dir_context {
        let user_path = context.config_path();
        if user_path.exists() {
            tracing::debug!("Loading user config from {:?}", user_path);
            return Config::load_from_file(&user_path);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputTarget;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let context = DirectoryContext::for_testing(temp_dir.path());

        let config = resolve_config(Some(&context), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(resolve_config(None, None).unwrap(), Config::default());
    }

    #[test]
    fn test_user_config_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let context = DirectoryContext::for_testing(temp_dir.path());
        std::fs::create_dir_all(&context.config_dir).unwrap();
        std::fs::write(
            context.config_path(),
            r#"{ "output": { "target": "stdout" } }"#,
        )
        .unwrap();

        let config = resolve_config(Some(&context), None).unwrap();
        assert_eq!(config.output.target, OutputTarget::Stdout);
    }

    #[test]
    fn test_explicit_config_wins() {
        let temp_dir = TempDir::new().unwrap();
        let context = DirectoryContext::for_testing(temp_dir.path());
        std::fs::create_dir_all(&context.config_dir).unwrap();
        std::fs::write(
            context.config_path(),
            r#"{ "output": { "target": "stdout" } }"#,
        )
        .unwrap();
        let explicit = temp_dir.path().join("explicit.json");
        std::fs::write(&explicit, r#"{ "output": { "target": "both" } }"#).unwrap();

        let config = resolve_config(Some(&context), Some(&explicit)).unwrap();
        assert_eq!(config.output.target, OutputTarget::Both);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(matches!(
            resolve_config(None, Some(&missing)),
            Err(ConfigError::IoError(_))
        ));
    }
}
