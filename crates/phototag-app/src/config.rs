//! Application configuration with YAML file persistence
//!
//! Default location: `<config dir>/phototag/config.yaml`

use std::path::{Path, PathBuf};

use phototag_types::{Error, Result, SortKey};
use serde::{Deserialize, Serialize};

/// Application configuration. Unknown keys in the file are ignored; missing
/// keys fall back to the defaults so older config files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Map tile provider shown in the UI (osm, esri, google)
    #[serde(default = "default_map_provider")]
    pub map_provider: String,

    /// Elevation provider (none, open-elevation, opentopodata)
    #[serde(default = "default_elevation_service")]
    pub elevation_service: String,

    /// strftime pattern for generated filenames
    #[serde(default = "default_filename_format")]
    pub filename_format: String,

    /// Scan subfolders recursively
    #[serde(default)]
    pub include_subfolders: bool,

    /// Photo list ordering
    #[serde(default)]
    pub sort_by: SortKey,

    /// Thumbnail edge length in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Last scanned folder
    #[serde(default)]
    pub folder_path: String,

    /// Persist the config file automatically on changes
    #[serde(default = "default_true")]
    pub auto_save_config: bool,
}

fn default_map_provider() -> String {
    "osm".to_string()
}

fn default_elevation_service() -> String {
    "open-elevation".to_string()
}

fn default_filename_format() -> String {
    "%Y%m%d_%H%M%S".to_string()
}

fn default_thumbnail_size() -> u32 {
    150
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_provider: default_map_provider(),
            elevation_service: default_elevation_service(),
            filename_format: default_filename_format(),
            include_subfolders: false,
            sort_by: SortKey::Time,
            thumbnail_size: default_thumbnail_size(),
            folder_path: String::new(),
            auto_save_config: true,
        }
    }
}

impl AppConfig {
    /// Default config file path under the user's config directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no user configuration directory".to_string()))?
            .join("phototag");
        Ok(config_dir.join("config.yaml"))
    }

    /// Load from a YAML file, or return defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config file: {e}")))?;
        Ok(config)
    }

    /// Save to a YAML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("cannot serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.map_provider, "osm");
        assert_eq!(config.filename_format, "%Y%m%d_%H%M%S");
        assert_eq!(config.thumbnail_size, 150);
        assert_eq!(config.sort_by, SortKey::Time);
        assert!(config.auto_save_config);
        assert!(!config.include_subfolders);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = AppConfig::default();
        config.map_provider = "esri".to_string();
        config.sort_by = SortKey::Name;
        config.thumbnail_size = 200;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.map_provider, "esri");
        assert_eq!(loaded.sort_by, SortKey::Name);
        assert_eq!(loaded.thumbnail_size, 200);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.map_provider, "osm");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "map_provider: google\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.map_provider, "google");
        assert_eq!(config.thumbnail_size, 150);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "thumbnail_size: [not, a, number]\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
