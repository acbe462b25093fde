use crate::error::AppError;
use crate::settings::FieldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_PIXEL_SCALE: f32 = 4.0;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Particle field parameters
    pub field: FieldConfig,
    /// Target frames per second
    pub fps: u32,
    /// Surface pixels per Braille dot
    pub pixel_scale: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            field: FieldConfig::default(),
            fps: DEFAULT_FPS,
            pixel_scale: DEFAULT_PIXEL_SCALE,
        }
    }
}

impl AppConfig {
    /// `<config dir>/particle-field/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-field").join("config.json"))
    }

    /// Export config to a JSON file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self).map_err(AppError::ConfigSerialize)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if it exists. A missing file gives the defaults,
    /// an unreadable one is logged and also gives the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(AppError::ConfigRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp host options and field parameters into their supported ranges
    pub fn clamped(self) -> Self {
        Self {
            field: self.field.clamped(),
            fps: self.fps.clamp(10, 240),
            pixel_scale: self.pixel_scale.clamp(1.0, 16.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            field: FieldConfig {
                density: 250.0,
                speed: 1.5,
                max_link_distance: 90.0,
                global_opacity: 0.4,
            },
            fps: 30,
            pixel_scale: 2.0,
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{ "field": { "density": 50 } }"#).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.field.density, 50.0);
        assert_eq!(loaded.field.speed, 0.5);
        assert_eq!(loaded.fps, DEFAULT_FPS);
        assert_eq!(loaded.pixel_scale, DEFAULT_PIXEL_SCALE);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(AppError::ConfigParse { .. })));
        assert_eq!(AppConfig::load_or_default(temp_file.path()), AppConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let path = Path::new("/nonexistent/path/config.json");
        assert!(matches!(
            AppConfig::load_from_file(path),
            Err(AppError::ConfigRead { .. })
        ));
        assert_eq!(AppConfig::load_or_default(path), AppConfig::default());
    }

    #[test]
    fn test_clamped() {
        let config = AppConfig {
            fps: 1000,
            pixel_scale: 0.0,
            ..AppConfig::default()
        }
        .clamped();
        assert_eq!(config.fps, 240);
        assert_eq!(config.pixel_scale, 1.0);
    }
}
