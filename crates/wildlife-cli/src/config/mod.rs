//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Persisted CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

pub struct SettingsManager;

impl SettingsManager {
    /// Get the wildlife home directory (~/.wildlife)
    pub fn wildlife_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("WILDLIFE_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".wildlife"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::wildlife_home()?.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults when none are saved
    pub fn load() -> Result<Settings> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn save(settings: &Settings) -> Result<()> {
        Self::save_to(&Self::settings_path()?, settings)
    }

    fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    fn save_to(path: &Path, settings: &Settings) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        Ok(())
    }
}

/// Normalize a user-supplied server URL
pub fn normalize_server_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!(
            "Invalid URL: {}. URL must start with http:// or https://",
            url
        );
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsManager::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            server_url: "https://wildlife.example.org".to_string(),
        };

        SettingsManager::save_to(&path, &settings).unwrap();
        assert_eq!(SettingsManager::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SettingsManager::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(
            normalize_server_url(" http://localhost:3001/ ").unwrap(),
            "http://localhost:3001"
        );
        assert!(normalize_server_url("localhost:3001").is_err());
    }
}
