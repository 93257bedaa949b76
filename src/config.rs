use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub file_tree: FileTreeConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// File tree behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTreeConfig {
    /// Keep expanded/selected state of entries that survive a directory
    /// reload. When false, a reload rebuilds the directory's children from
    /// scratch and their state is lost.
    #[serde(default = "default_true")]
    pub preserve_state_on_reload: bool,

    /// Moving past the last row returns to the first one, and vice versa
    #[serde(default = "default_true")]
    pub wrap_navigation: bool,
}

impl Default for FileTreeConfig {
    fn default() -> Self {
        Self {
            preserve_state_on_reload: true,
            wrap_navigation: true,
        }
    }
}

/// Where the finished document goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Clipboard,
    Stdout,
    Both,
}

impl OutputTarget {
    pub fn to_clipboard(self) -> bool {
        matches!(self, OutputTarget::Clipboard | OutputTarget::Both)
    }

    pub fn to_stdout(self) -> bool {
        matches!(self, OutputTarget::Stdout | OutputTarget::Both)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub target: OutputTarget,
}

/// Layout and timing of the interactive screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Share of the screen width used by the tree, in percent
    #[serde(default = "default_tree_width_percent")]
    pub tree_width_percent: u16,

    /// How long to wait for terminal input before checking for file changes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_tree_width_percent() -> u16 {
    50
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tree_width_percent: default_tree_width_percent(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Effective configuration as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=90).contains(&self.ui.tree_width_percent) {
            return Err(ConfigError::ValidationError(format!(
                "ui.tree_width_percent must be between 10 and 90, got {}",
                self.ui.tree_width_percent
            )));
        }

        if self.ui.poll_interval_ms == 0 || self.ui.poll_interval_ms > 1000 {
            return Err(ConfigError::ValidationError(format!(
                "ui.poll_interval_ms must be between 1 and 1000, got {}",
                self.ui.poll_interval_ms
            )));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.file_tree.preserve_state_on_reload);
        assert!(config.file_tree.wrap_navigation);
        assert_eq!(config.output.target, OutputTarget::Clipboard);
        assert_eq!(config.ui.tree_width_percent, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "output": { "target": "both" } }"#).unwrap();
        assert_eq!(config.output.target, OutputTarget::Both);
        assert!(config.output.target.to_clipboard());
        assert!(config.output.target.to_stdout());
        assert_eq!(config.file_tree, FileTreeConfig::default());
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.file_tree.preserve_state_on_reload = false;
        config.output.target = OutputTarget::Stdout;

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"stdout\""));
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_validation_rejects_bad_width() {
        let mut config = Config::default();
        config.ui.tree_width_percent = 95;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "ui": { "poll_interval_ms": 20 } }"#).unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.ui.poll_interval_ms, 20);
        assert_eq!(config.ui.tree_width_percent, 50);
    }

    #[test]
    fn test_load_from_file_errors() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));

        assert!(matches!(
            Config::load_from_file("/definitely/missing/config.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
