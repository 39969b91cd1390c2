use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub default_name: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Backend resolution: explicit flag wins, then the config file, then
    /// the built-in local address.
    pub fn resolve_backend(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("kostplan").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.backend_url.is_none());
        assert!(config.default_name.is_none());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            backend_url: Some("http://10.0.0.5:8080".to_string()),
            default_name: Some("Anna".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend_url.as_deref(), Some("http://10.0.0.5:8080"));
        assert_eq!(loaded.default_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn backend_resolution_order() {
        let config = Config {
            backend_url: Some("http://from-config:8080".to_string()),
            default_name: None,
        };
        assert_eq!(
            config.resolve_backend(Some("http://from-flag:8080")),
            "http://from-flag:8080"
        );
        assert_eq!(config.resolve_backend(None), "http://from-config:8080");
        assert_eq!(Config::default().resolve_backend(None), DEFAULT_BASE_URL);
    }
}
