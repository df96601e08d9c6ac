//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the cache directory, the base URL of share links and the
//! last email used to log in.
//!
//! Configuration is stored at `~/.config/riba-market/config.json`. The
//! `RIBA_DATA_DIR` and `RIBA_SHARE_BASE_URL` environment variables take
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "riba-market";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DATA_DIR_ENV: &str = "RIBA_DATA_DIR";
pub const SHARE_BASE_URL_ENV: &str = "RIBA_SHARE_BASE_URL";

pub const DEFAULT_SHARE_BASE_URL: &str = "https://ribamarket.com";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub share_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `RIBA_DATA_DIR` and `RIBA_SHARE_BASE_URL` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(SHARE_BASE_URL_ENV).ok(),
        )
    }

    /// Blank values are ignored.
    pub fn with_overrides(mut self, data_dir: Option<String>, share_base_url: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = share_base_url.filter(|u| !u.trim().is_empty()) {
            self.share_base_url = Some(url);
        }
        self
    }

    /// Directory holding the local cache documents.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn share_base_url(&self) -> &str {
        self.share_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SHARE_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("riba-config-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_default() {
        let config = Config::load_from(&temp_path(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.share_base_url(), DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path(CONFIG_FILE);
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/riba")),
            share_base_url: None,
            last_email: Some("demo@ribamarket.com".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_overrides_win_unless_blank() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/file")),
            ..Config::default()
        };
        let overridden = config
            .clone()
            .with_overrides(Some("/from/env".to_string()), Some("https://shop.example".to_string()));
        assert_eq!(overridden.data_dir().unwrap(), PathBuf::from("/from/env"));
        assert_eq!(overridden.share_base_url(), "https://shop.example");

        let kept = config.with_overrides(Some("  ".to_string()), None);
        assert_eq!(kept.data_dir().unwrap(), PathBuf::from("/from/file"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path(CONFIG_FILE);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
