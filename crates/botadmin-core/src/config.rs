use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::layout::DEFAULT_CELL_WIDTH_PX;
use crate::locale::Locale;
use crate::upload::{UploadPolicy, BYTES_PER_MIB};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub locale: Option<String>,
    /// "dark" or "light"; unset means follow the terminal.
    pub theme: Option<String>,
    pub max_file_size_mb: Option<f64>,
    pub cell_width_px: Option<u16>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_theme(dark: bool) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.theme = Some(if dark { "dark" } else { "light" }.to_string());
        config.save()
    }

    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .and_then(Locale::from_str)
            .unwrap_or_default()
    }

    /// Stored theme preference, if any.
    pub fn dark_mode(&self) -> Option<bool> {
        match self.theme.as_deref()?.to_lowercase().as_str() {
            "dark" => Some(true),
            "light" => Some(false),
            _ => None,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        match self.max_file_size_mb {
            Some(mb) if mb > 0.0 => UploadPolicy::new((mb * BYTES_PER_MIB as f64) as u64),
            _ => UploadPolicy::default(),
        }
    }

    pub fn cell_width_px(&self) -> u16 {
        self.cell_width_px.filter(|w| *w > 0).unwrap_or(DEFAULT_CELL_WIDTH_PX)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("botadmin").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::DEFAULT_MAX_FILE_SIZE;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.dark_mode(), None);
        assert_eq!(config.upload_policy().max_file_size_bytes, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.cell_width_px(), DEFAULT_CELL_WIDTH_PX);
    }

    #[test]
    fn test_round_trip_through_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            locale: Some("fr".to_string()),
            theme: Some("light".to_string()),
            max_file_size_mb: Some(2.5),
            cell_width_px: Some(9),
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.locale(), Locale::Fr);
        assert_eq!(loaded.dark_mode(), Some(false));
        assert_eq!(loaded.upload_policy().max_file_size_bytes, 2_621_440);
        assert_eq!(loaded.cell_width_px(), 9);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_nonsense_values_fall_back() {
        let config = Config {
            locale: Some("klingon".to_string()),
            theme: Some("neon".to_string()),
            max_file_size_mb: Some(-1.0),
            cell_width_px: Some(0),
        };
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.dark_mode(), None);
        assert_eq!(config.upload_policy(), UploadPolicy::default());
        assert_eq!(config.cell_width_px(), DEFAULT_CELL_WIDTH_PX);
    }
}
