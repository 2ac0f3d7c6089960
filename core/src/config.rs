//! Client settings persisted next to the identity file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3010";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiaryConfig {
    /// Root of the travel service; `/travel` is appended for API calls.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Global timeout for one HTTP round-trip. Zero is read as one second.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DiaryConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self, StorageError> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<(), StorageError> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DiaryConfig::load(dir.path()).unwrap();
        assert_eq!(config, DiaryConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"base_url":"https://diary.example"}"#).unwrap();
        let config = DiaryConfig::load(dir.path()).unwrap();
        assert_eq!(config.base_url, "https://diary.example");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = DiaryConfig {
            timeout_secs: 0,
            ..DiaryConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = DiaryConfig {
            base_url: "http://10.0.0.2:3010".to_string(),
            timeout_secs: 5,
        };
        config.save(dir.path().join("nested")).unwrap();
        assert_eq!(DiaryConfig::load(dir.path().join("nested")).unwrap(), config);
    }
}
