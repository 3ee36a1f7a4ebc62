use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Camera tuning applied on top of the fly camera defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Units per second.
    pub speed: f32,
    /// Speed factor while the `sprint` action is held.
    pub sprint_multiplier: f32,
    /// Radians per unit of look input.
    pub sensitivity: f32,
    pub fov_degrees: f32,
    /// Only turn while the `drag` action is held.
    pub look_requires_drag: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            sprint_multiplier: 3.0,
            sensitivity: 0.003,
            fov_degrees: 45.0,
            look_requires_drag: true,
        }
    }
}

/// Engine tuning, stored as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Update and render rate in Hz. Zero runs every frame.
    pub update_rate: f64,
    /// Fixed physics rate in Hz.
    pub physics_rate: f64,
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_rate: 0.0,
            physics_rate: 60.0,
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "update_rate": 144.0 }"#).unwrap();
        assert_eq!(config.update_rate, 144.0);
        assert_eq!(config.physics_rate, 60.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = EngineConfig {
            physics_rate: 30.0,
            ..EngineConfig::default()
        };
        config.save(tmp.path()).unwrap();
        assert_eq!(EngineConfig::load(tmp.path()).unwrap(), config);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
