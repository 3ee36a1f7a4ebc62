use std::fmt::Debug;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::key::InputKey;

/// A value type an [`InputAction`](crate::InputAction) can produce.
///
/// Each active mapping contributes `sample(axis, raw * weight)`, and the
/// contributions are folded together with `merge` starting from
/// `Default::default()`. The default value is the relaxed state.
pub trait ActionValue: Copy + PartialEq + Default + Debug + 'static {
    /// Per-mapping direction data.
    type Axis: Copy + PartialEq + Debug + 'static;

    /// Whether `performed` fires on every tick the action is held, even when
    /// the value did not change.
    const REPEATS_WHILE_HELD: bool;

    fn sample(axis: Self::Axis, raw: f32) -> Self;

    fn merge(self, other: Self) -> Self;

    fn is_relaxed(&self) -> bool {
        *self == Self::default()
    }
}

impl ActionValue for bool {
    type Axis = ();
    const REPEATS_WHILE_HELD: bool = true;

    fn sample(_axis: (), raw: f32) -> Self {
        raw != 0.0
    }

    fn merge(self, other: Self) -> Self {
        self || other
    }
}

impl ActionValue for Vec3 {
    type Axis = Vec3;
    const REPEATS_WHILE_HELD: bool = false;

    fn sample(axis: Vec3, raw: f32) -> Self {
        axis * raw
    }

    fn merge(self, other: Self) -> Self {
        self + other
    }
}

/// How a mapping's raw samples turn into a contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composite {
    /// The raw value itself. Zero means released.
    #[default]
    Value,
    /// The change in the raw value since the previous tick.
    Delta,
}

/// Static binding of one physical key to an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMapping<V: ActionValue> {
    pub key: InputKey,
    pub axis: V::Axis,
    pub weight: f32,
    pub device_index: u32,
}

impl InputMapping<bool> {
    pub fn button(key: InputKey) -> Self {
        Self {
            key,
            axis: (),
            weight: 1.0,
            device_index: 0,
        }
    }
}

impl InputMapping<Vec3> {
    pub fn axis(key: InputKey, axis: Vec3) -> Self {
        Self {
            key,
            axis,
            weight: 1.0,
            device_index: 0,
        }
    }
}

impl<V: ActionValue> InputMapping<V> {
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn on_device(mut self, device_index: u32) -> Self {
        self.device_index = device_index;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_merges_with_or() {
        let held = bool::sample((), 1.0).merge(bool::sample((), 0.0));
        assert!(held);
        assert!(!held.is_relaxed());
        assert!(false.is_relaxed());
    }

    #[test]
    fn vectors_sum_without_normalizing() {
        let v = Vec3::sample(Vec3::X, 1.0).merge(Vec3::sample(Vec3::Y, 1.0));
        assert_eq!(v, Vec3::new(1.0, 1.0, 0.0));
        assert!(Vec3::sample(Vec3::X, 1.0).merge(Vec3::sample(-Vec3::X, 1.0)).is_relaxed());
    }

    #[test]
    fn mapping_builders() {
        let m = InputMapping::axis(InputKey::GamepadLeftThumbX, Vec3::X)
            .with_weight(0.5)
            .on_device(2);
        assert_eq!(m.weight, 0.5);
        assert_eq!(m.device_index, 2);
        assert_eq!(InputMapping::button(InputKey::Space).weight, 1.0);
    }

    #[test]
    fn composite_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Composite::Delta).unwrap(), "\"delta\"");
    }
}
