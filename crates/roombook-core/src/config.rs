//! Configuration resolution for roombook.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.roombook/config.json)
//! 3. Environment variables (highest priority)
//!
//! The API base path is fixed at process start; nothing re-reads it at
//! runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default backend base URL of the original deployment.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Complete roombook client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST API base URL (e.g., "<http://localhost:8080/api>").
    pub api_base_url: String,
    /// Directory holding the durable session entries. Defaults to the
    /// config directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            log_level: "roombook=info".to_string(),
        }
    }
}

impl Config {
    /// Path to the config directory: `~/.roombook/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roombook"))
    }

    /// Path to the config file: `~/.roombook/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Directory where the session entries (`token`, `user.json`) live.
    pub fn session_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(Self::config_dir)
    }

    /// Load configuration with hierarchical resolution.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            config = Self::load_file(&path)?;
            debug!(path = %path.display(), "loaded config file");
        }
        config.apply_env_overrides();
        debug!(api_base_url = %config.api_base_url, "configuration resolved");
        Ok(config)
    }

    /// Read a config file from an explicit path.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ROOMBOOK_API_URL") {
            self.api_base_url = val;
        }
        if let Ok(val) = std::env::var("ROOMBOOK_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ROOMBOOK_LOG_LEVEL") {
            self.log_level = val;
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn config_round_trips_json() {
        let config = Config {
            api_base_url: "https://booking.example.com/api".into(),
            data_dir: Some(PathBuf::from("/tmp/roombook")),
            log_level: "roombook=debug".into(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.api_base_url, "https://booking.example.com/api");
        assert_eq!(loaded.data_dir.unwrap(), PathBuf::from("/tmp/roombook"));
    }

    #[test]
    fn load_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Config::load_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_file_reads_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_base_url":"http://host:9090/api","log_level":"roombook=warn"}"#,
        )
        .unwrap();
        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.api_base_url, "http://host:9090/api");
        assert_eq!(config.log_level, "roombook=warn");
    }

    #[test]
    fn session_dir_prefers_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/x")),
            ..Default::default()
        };
        assert_eq!(config.session_dir().unwrap(), PathBuf::from("/tmp/x"));
    }
}
