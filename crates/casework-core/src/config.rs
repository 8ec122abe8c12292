//! Configuration loading
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/casework/config.toml`
//! 3. Explicit config file (e.g. `--config` on the CLI)
//! 4. Environment variables: `CASEWORK_*`
//!
//! Files are merged key by key: a file that only sets `lines` leaves
//! `note_preview_chars` at whatever an earlier layer chose.
//!
//! # Example Config
//!
//! ```toml
//! lines = ["DC", "MD", "VA"]
//! note_preview_chars = 44
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{identifiers::Line, note::DEFAULT_PREVIEW_CHARS};

const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Environment variable overriding `lines` (comma separated).
pub const ENV_LINES: &str = "CASEWORK_LINES";
/// Environment variable overriding `note_preview_chars`.
pub const ENV_NOTE_PREVIEW_CHARS: &str = "CASEWORK_NOTE_PREVIEW_CHARS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("config file {} exceeds maximum size of {MAX_CONFIG_FILE_SIZE} bytes", path.display())]
    TooLarge { path: PathBuf },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lines a case may be opened on. Empty permits any line.
    pub lines: Vec<Line>,
    /// Width of note previews, in characters
    pub note_preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            note_preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Configuration layer with only the keys a file actually set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub lines: Option<Vec<Line>>,
    pub note_preview_chars: Option<usize>,
}

impl PartialConfig {
    /// Parse a TOML document; `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML, unknown keys, or
    /// invalid line codes.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, `TooLarge` past
    /// 1 MiB, or any error from [`PartialConfig::from_toml_str`].
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io_error)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(io_error)?;
        Self::from_toml_str(&content, path)
    }
}

impl Config {
    /// Load defaults, the global file if present, `explicit` if given, then
    /// environment overrides.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any present layer is unreadable or invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global) = global_config_path() {
            match PartialConfig::load_file(&global) {
                Ok(partial) => {
                    tracing::debug!(path = %global.display(), "loaded global config");
                    config.merge_partial(partial);
                }
                Err(ConfigError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        if let Some(path) = explicit {
            config.merge_partial(PartialConfig::load_file(path)?);
            tracing::debug!(path = %path.display(), "loaded config file");
        }

        config.apply_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Overwrite every key the partial layer set.
    pub fn merge_partial(&mut self, partial: PartialConfig) {
        if let Some(lines) = partial.lines {
            self.lines = lines;
        }
        if let Some(width) = partial.note_preview_chars {
            self.note_preview_chars = width;
        }
    }

    /// Whether a case may be opened on `line`.
    #[must_use]
    pub fn permits_line(&self, line: &Line) -> bool {
        self.lines.is_empty() || self.lines.contains(line)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `note_preview_chars` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.note_preview_chars == 0 {
            return Err(ConfigError::InvalidValue {
                key: "note_preview_chars".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn apply_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(ENV_LINES) {
            self.lines = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Line::parse)
                .collect::<Result<_, _>>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: ENV_LINES.to_string(),
                    message: e.to_string(),
                })?;
        }

        if let Ok(value) = std::env::var(ENV_NOTE_PREVIEW_CHARS) {
            self.note_preview_chars =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: ENV_NOTE_PREVIEW_CHARS.to_string(),
                        message: e.to_string(),
                    })?;
        }

        Ok(())
    }
}

fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "casework")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
