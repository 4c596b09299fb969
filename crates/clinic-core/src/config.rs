//! Runtime configuration.
//!
//! Read from a JSON file; every field has a default, and a couple of
//! environment variables override the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::EntityKind;
use crate::store::IdPolicy;

pub const DATA_DIR_ENV: &str = "CLINIC_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "CLINIC_LOG_LEVEL";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicConfig {
    /// Directory holding the `.dat` snapshots
    pub data_dir: PathBuf,
    /// How new ids are picked
    pub id_policy: IdPolicy,
    /// Write snapshots to a temp file and rename over the target
    pub atomic_writes: bool,
    /// Create the default administrator when there are no users
    pub seed_admin: bool,
    pub log: LogConfig,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            id_policy: IdPolicy::default(),
            atomic_writes: true,
            seed_admin: true,
            log: LogConfig::default(),
        }
    }
}

impl ClinicConfig {
    /// Load from a JSON file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)?.with_overrides(|name| std::env::var(name).ok())
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same config rooted at another data directory.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log.level = level.parse()?;
        }
        Ok(self)
    }

    /// Path of the snapshot file holding `kind`.
    pub fn data_file(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub ansi_enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            ansi_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(level)
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidValue {
                name: LOG_LEVEL_ENV,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Pretty,
    Structured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.id_policy, IdPolicy::LiveCount);
        assert!(config.atomic_writes);
        assert!(config.seed_admin);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClinicConfig::from_json(
            r#"{"data_dir": "/var/clinic", "id_policy": "monotonic", "log": {"format": "structured"}}"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/clinic"));
        assert_eq!(config.id_policy, IdPolicy::Monotonic);
        assert_eq!(
            config.data_file(EntityKind::Patient),
            PathBuf::from("/var/clinic/patients.dat")
        );
        assert_eq!(config.log.format, LogFormat::Structured);
        assert_eq!(config.log.level, LogLevel::Info);
        assert!(config.atomic_writes);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ClinicConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = ClinicConfig::default()
            .with_overrides(|name| match name {
                DATA_DIR_ENV => Some("/tmp/clinic".into()),
                LOG_LEVEL_ENV => Some("DEBUG".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/clinic"));
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_log_level_override() {
        let result = ClinicConfig::default().with_overrides(|name| match name {
            LOG_LEVEL_ENV => Some("loud".into()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.json");
        std::fs::write(&path, r#"{"atomic_writes": false}"#).unwrap();

        let config = ClinicConfig::load(&path).unwrap();
        assert!(!config.atomic_writes);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClinicConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
