//! Configuration file support for depaudit
//!
//! Reads configuration from `~/.config/depaudit/config.json`:
//!
//! ```json
//! {
//!   "packages": "audit/packages_list.txt",
//!   "manifest": "package.json",
//!   "lockfile": "package-lock.json",
//!   "output": "audit/dependency-check-results.json"
//! }
//! ```
//!
//! Every field is optional and supplies a default input/output path.
//! Command-line flags take precedence over the config file.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine config directory. HOME environment variable not set.")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Default package list path
    pub packages: Option<PathBuf>,

    /// Default manifest path
    pub manifest: Option<PathBuf>,

    /// Default lockfile path
    pub lockfile: Option<PathBuf>,

    /// Default summary output path
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path or return defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError { path, source })
    }
}

/// Returns the config file path: `~/.config/depaudit/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_default()
        });

    if config_base.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigDir);
    }

    Ok(config_base.join("depaudit").join("config.json"))
}
