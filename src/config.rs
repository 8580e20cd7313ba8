//! Session configuration: ~/.config/creel/config.toml.
//!
//! The file is optional — missing or empty files yield `Config::default()`.
//! It records the current session user and an optional database path
//! override. Core operations never read it; the CLI layer resolves the
//! acting user once and passes it down explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config file: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("HOME environment variable not set")]
    NoHome,
}

// ============================================================================
// Configuration
// ============================================================================

/// Session state persisted between invocations.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified; unknown keys are accepted with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file path. Defaults to `creel.db` in the config directory.
    pub db_path: Option<PathBuf>,

    /// Name of the logged-in user, set by `register` and `login`.
    pub current_user: Option<String>,
}

/// The directory holding config.toml and the default database.
///
/// `$CREEL_CONFIG_DIR` overrides the platform default (used by tests to
/// stay out of the real home directory).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os("CREEL_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".config").join("creel"))
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Flag probable typos before serde silently drops them
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["db_path", "current_user"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "unknown key in config file, ignoring");
                }
            }
        }

        Ok(toml::from_str(&content)?)
    }

    /// Write the configuration back, via temp-file-then-rename so a crash
    /// mid-write cannot leave a truncated file behind.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, rendered)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
