//! Configuration for param-sfo binaries
//!
//! The configuration lives in `<config dir>/param-sfo/config.toml`. A missing
//! file, or any missing field, falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SfoError};

/// Name of the directory under the platform config dir
pub const CONFIG_DIR_NAME: &str = "param-sfo";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// SFO file opened when no path is given
pub const DEFAULT_SFO_PATH: &str = "PARAM.SFO";

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Debug and logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log verbosity
    pub log_level: LogLevel,
    /// Mirror log output to `log_path`
    pub log_to_file: bool,
    /// Log file location
    pub log_path: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_to_file: false,
            log_path: PathBuf::from("param-sfo.log"),
        }
    }
}

/// SFO file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfoConfig {
    /// File opened by the demo binary
    pub default_path: PathBuf,
}

impl Default for SfoConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_SFO_PATH),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug: DebugConfig,
    pub sfo: SfoConfig,
}

impl Config {
    /// Location of the configuration file, if the platform has a config dir
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from `path`; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| SfoError::config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save the configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| SfoError::config("No configuration directory available"))?;
        self.save_to(path)
    }

    /// Save the configuration to `path`, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| SfoError::config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debug.log_level, LogLevel::Warn);
        assert!(!config.debug.log_to_file);
        assert_eq!(config.sfo.default_path, PathBuf::from(DEFAULT_SFO_PATH));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[debug]\nlog_level = \"trace\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.debug.log_level, LogLevel::Trace);
        assert_eq!(config.sfo, SfoConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.debug.log_to_file = true;
        config.sfo.default_path = PathBuf::from("PS3_GAME/PARAM.SFO");
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "debug = 5").unwrap();

        assert!(matches!(Config::load_from(&path), Err(SfoError::Config(_))));
    }
}
