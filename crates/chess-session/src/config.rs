//! Session configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for a [`GameArena`](crate::GameArena).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Maximum number of games held at once. Defaults to 1024.
    #[serde(default = "default_max_games")]
    pub max_games: usize,
    /// Refuse moves on games that already ended, without consulting the
    /// rules engine. Defaults to true.
    #[serde(default = "default_reject_moves_after_terminal")]
    pub reject_moves_after_terminal: bool,
    /// Default log filter for binaries. Defaults to "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_games() -> usize {
    1024
}

fn default_reject_moves_after_terminal() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_games: default_max_games(),
            reject_moves_after_terminal: default_reject_moves_after_terminal(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Like [`load`](Self::load), but returns the defaults when the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config: SessionConfig = toml::from_str(
            r#"
max_games = 16
reject_moves_after_terminal = false
log_level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.max_games, 16);
        assert!(!config.reject_moves_after_terminal);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SessionConfig = toml::from_str("max_games = 3").unwrap();
        assert_eq!(config.max_games, 3);
        assert!(config.reject_moves_after_terminal);
        assert_eq!(config.log_level, "info");

        let empty: SessionConfig = toml::from_str("").unwrap();
        assert_eq!(empty, SessionConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_games = 2").unwrap();
        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.max_games, 2);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_games = \"lots\"").unwrap();
        assert!(matches!(
            SessionConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            SessionConfig::load("/nonexistent/chess.toml"),
            Err(ConfigError::ReadError(_))
        ));
    }
}
