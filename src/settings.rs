//! Persistent editor settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::accumulation::{DEFAULT_MAX_SAMPLES, DEFAULT_RESET_SAMPLE_INDEX, SAMPLE_LIMIT};
use crate::edit::{InputSteps, PreviewMode};
use crate::util::{Error, Result};

/// Editor settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Edit stack
    pub initial_capacity: usize,
    pub preview_mode: PreviewMode,

    // Accumulation
    pub max_samples: u32,
    pub reset_sample_index: u32,

    // Editing
    pub material_count: u32,
    pub brush_distance: f32,
    pub nudge_up: f32,
    pub nudge_down: f32,

    // Window
    pub window_width: u32,
    pub window_height: u32,

    // Camera
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_capacity: 32,
            preview_mode: PreviewMode::Live,
            max_samples: DEFAULT_MAX_SAMPLES,
            reset_sample_index: DEFAULT_RESET_SAMPLE_INDEX,
            material_count: 3,
            brush_distance: 5.0,
            nudge_up: 1.1,
            nudge_down: 0.9,
            window_width: 1920,
            window_height: 1080,
            camera_eye: Vec3::new(-1.0, 4.0, 10.0),
            camera_target: Vec3::ZERO,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Settings {
    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("sdfedit");
            p.push("settings.json");
            p
        })
    }

    /// Load settings.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and anything unreadable falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
                    _ => Error::Io(e),
                })?;
                serde_json::from_str(&text)?
            }
            None => Self::load_default_location(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn load_default_location() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed settings at {}: {e}", path.display());
            Self::default()
        })
    }

    /// Save settings to `path`, or the default location
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()
                .ok_or_else(|| Error::config("no config directory on this platform"))?,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_samples > SAMPLE_LIMIT {
            return Err(Error::config(format!(
                "max_samples must be at most {SAMPLE_LIMIT}, got {}",
                self.max_samples
            )));
        }
        if self.reset_sample_index == 0 || self.reset_sample_index > self.max_samples {
            return Err(Error::config(format!(
                "reset_sample_index must be in 1..={}, got {}",
                self.max_samples, self.reset_sample_index
            )));
        }
        if self.material_count == 0 {
            return Err(Error::config("material_count must be at least 1"));
        }
        if !(self.nudge_up > 1.0 && self.nudge_down > 0.0 && self.nudge_down < 1.0) {
            return Err(Error::config("nudge_up must be > 1 and nudge_down in (0, 1)"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::config("window size must be non-zero"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(Error::config("clip planes must satisfy 0 < near < far"));
        }
        Ok(())
    }

    /// Input step factors for the mapper
    pub fn input_steps(&self) -> InputSteps {
        InputSteps {
            nudge_up: self.nudge_up,
            nudge_down: self.nudge_down,
            brush_distance: self.brush_distance,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "initial_capacity": 8, "preview_mode": "hidden" }"#).unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.initial_capacity, 8);
        assert_eq!(s.preview_mode, PreviewMode::Hidden);
        assert_eq!(s.max_samples, DEFAULT_MAX_SAMPLES);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let s = Settings { reset_sample_index: 0, ..Default::default() };
        assert!(s.validate().is_err());
        let s = Settings { near: 10.0, far: 1.0, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_max_samples_bounded_by_f32_precision() {
        let s = Settings { max_samples: SAMPLE_LIMIT, ..Default::default() };
        s.validate().unwrap();
        let s = Settings { max_samples: SAMPLE_LIMIT + 1, ..Default::default() };
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings { material_count: 5, ..Default::default() };
        s.save(Some(&path)).unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap(), s);
    }
}
