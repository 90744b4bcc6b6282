//! Configuration management for tvshelf
//!
//! Handles config file loading/saving and environment overrides.
//! Config is stored at ~/.config/tvshelf/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::tvmaze::DEFAULT_BASE_URL;
use crate::store::FileStore;

const ENV_API_URL: &str = "TVSHELF_API_URL";
const ENV_DATA_DIR: &str = "TVSHELF_DATA_DIR";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API base URL
    pub api_base_url: Option<String>,
    /// Where favorites are persisted
    pub data_dir: Option<PathBuf>,
    /// Pages fetched by `list` when --pages is not given
    pub default_pages: Option<u32>,
}

impl Config {
    /// Get config file path (~/.config/tvshelf/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tvshelf").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from an explicit path, or return default if missing/invalid
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// API base URL with fallback chain:
    /// 1. Environment variable TVSHELF_API_URL
    /// 2. Value from config file
    /// 3. Public TVMaze API
    pub fn api_base_url(&self) -> String {
        std::env::var(ENV_API_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Data directory with fallback chain:
    /// 1. Environment variable TVSHELF_DATA_DIR
    /// 2. Value from config file
    /// 3. Platform data dir (~/.local/share/tvshelf)
    pub fn data_dir(&self) -> Option<PathBuf> {
        std::env::var_os(ENV_DATA_DIR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.data_dir.clone())
            .or_else(FileStore::default_dir)
    }

    pub fn default_pages(&self) -> u32 {
        self.default_pages.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert!(config.data_dir.is_none());
        assert_eq!(config.default_pages(), 1);
    }

    #[test]
    fn test_zero_pages_clamped() {
        let config = Config {
            default_pages: Some(0),
            ..Config::default()
        };
        assert_eq!(config.default_pages(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("nested").join("config.toml");
        let config = Config {
            api_base_url: Some("http://localhost:9999".to_string()),
            data_dir: Some(temp.path().join("data")),
            default_pages: Some(3),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "default_pages = \"lots\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
