use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::key::{InputDeviceType, InputKey};
use crate::value::Composite;

fn unit_weight() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonMappingConfig {
    pub key: InputKey,
    #[serde(default)]
    pub device_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMappingConfig {
    pub key: InputKey,
    pub axis: Vec3,
    #[serde(default = "unit_weight")]
    pub weight: f32,
    #[serde(default)]
    pub device_index: u32,
}

/// One action in a bindings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionConfig {
    Button {
        name: String,
        mappings: Vec<ButtonMappingConfig>,
    },
    Vector {
        name: String,
        #[serde(default)]
        composite: Composite,
        mappings: Vec<AxisMappingConfig>,
    },
}

impl ActionConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Button { name, .. } | Self::Vector { name, .. } => name,
        }
    }

    pub fn mapping_count(&self) -> usize {
        match self {
            Self::Button { mappings, .. } => mappings.len(),
            Self::Vector { mappings, .. } => mappings.len(),
        }
    }
}

/// Serializable description of an action map, stored as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingsConfig {
    pub actions: Vec<ActionConfig>,
}

impl BindingsConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InputError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects duplicate names, keys that belong to no device, and vector
    /// mappings along a zero axis.
    pub fn validate(&self) -> Result<(), InputError> {
        let mut seen = std::collections::BTreeSet::new();
        for action in &self.actions {
            if !seen.insert(action.name()) {
                return Err(InputError::DuplicateAction(action.name().to_string()));
            }
            match action {
                ActionConfig::Button { name, mappings } => {
                    if mappings.iter().any(|m| m.key.device_type() == InputDeviceType::Unknown) {
                        return Err(InputError::UnknownKey { action: name.clone() });
                    }
                }
                ActionConfig::Vector { name, mappings, .. } => {
                    for m in mappings {
                        if m.key.device_type() == InputDeviceType::Unknown {
                            return Err(InputError::UnknownKey { action: name.clone() });
                        }
                        if m.axis == Vec3::ZERO {
                            return Err(InputError::ZeroAxis {
                                action: name.clone(),
                                key: m.key,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Fly-camera layout: WASD plus Space/Ctrl and the left stick for `move`,
    /// cursor position deltas for `look`, right mouse button for `drag`, and
    /// left shift for `sprint`.
    pub fn camera_defaults() -> Self {
        let axis = |key, axis| AxisMappingConfig {
            key,
            axis,
            weight: 1.0,
            device_index: 0,
        };
        let button = |key| ButtonMappingConfig { key, device_index: 0 };

        Self {
            actions: vec![
                ActionConfig::Vector {
                    name: "move".into(),
                    composite: Composite::Value,
                    mappings: vec![
                        axis(InputKey::KeyW, Vec3::Z),
                        axis(InputKey::KeyS, -Vec3::Z),
                        axis(InputKey::KeyD, Vec3::X),
                        axis(InputKey::KeyA, -Vec3::X),
                        axis(InputKey::Space, Vec3::Y),
                        axis(InputKey::LeftControl, -Vec3::Y),
                        axis(InputKey::GamepadLeftThumbX, Vec3::X),
                        axis(InputKey::GamepadLeftThumbY, Vec3::Z),
                    ],
                },
                ActionConfig::Vector {
                    name: "look".into(),
                    composite: Composite::Delta,
                    mappings: vec![
                        axis(InputKey::MousePosX, Vec3::X),
                        axis(InputKey::MousePosY, Vec3::Y),
                    ],
                },
                ActionConfig::Button {
                    name: "drag".into(),
                    mappings: vec![button(InputKey::MouseRight)],
                },
                ActionConfig::Button {
                    name: "sprint".into(),
                    mappings: vec![button(InputKey::LeftShift)],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_defaults_validate() {
        let config = BindingsConfig::camera_defaults();
        config.validate().unwrap();
        assert_eq!(config.actions.len(), 4);
        assert_eq!(config.actions[0].mapping_count(), 8);
    }

    #[test]
    fn parses_minimal_json_with_defaults() {
        let json = r#"{
            "actions": [
                { "kind": "button", "name": "jump", "mappings": [ { "key": "Space" } ] },
                { "kind": "vector", "name": "pan",
                  "mappings": [ { "key": "MouseMoveX", "axis": [1.0, 0.0, 0.0] } ] }
            ]
        }"#;
        let config = BindingsConfig::from_json_str(json).unwrap();
        match &config.actions[1] {
            ActionConfig::Vector {
                composite, mappings, ..
            } => {
                assert_eq!(*composite, Composite::Value);
                assert_eq!(mappings[0].weight, 1.0);
                assert_eq!(mappings[0].device_index, 0);
            }
            other => panic!("expected a vector action, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicates_unknown_keys_and_zero_axes() {
        let mut config = BindingsConfig::camera_defaults();
        config.actions.push(ActionConfig::Button {
            name: "drag".into(),
            mappings: Vec::new(),
        });
        assert!(matches!(config.validate(), Err(InputError::DuplicateAction(_))));

        let unknown = BindingsConfig {
            actions: vec![ActionConfig::Button {
                name: "x".into(),
                mappings: vec![ButtonMappingConfig {
                    key: InputKey::Unknown,
                    device_index: 0,
                }],
            }],
        };
        assert!(matches!(unknown.validate(), Err(InputError::UnknownKey { .. })));

        let zero = BindingsConfig {
            actions: vec![ActionConfig::Vector {
                name: "y".into(),
                composite: Composite::Value,
                mappings: vec![AxisMappingConfig {
                    key: InputKey::KeyW,
                    axis: Vec3::ZERO,
                    weight: 1.0,
                    device_index: 0,
                }],
            }],
        };
        assert!(matches!(zero.validate(), Err(InputError::ZeroAxis { .. })));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = BindingsConfig::camera_defaults();
        config.save(tmp.path()).unwrap();
        let loaded = BindingsConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            BindingsConfig::from_json_str("{ not json"),
            Err(InputError::Json(_))
        ));
    }
}
