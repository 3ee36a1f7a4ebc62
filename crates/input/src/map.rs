use std::collections::BTreeMap;

use glam::Vec3;

use crate::action::InputAction;
use crate::bindings::{ActionConfig, BindingsConfig};
use crate::error::InputError;
use crate::system::InputSystem;
use crate::value::{ActionValue, Composite, InputMapping};

/// A value type an [`ActionMap`] can store. Selects which of the map's two
/// tables holds actions of that type.
pub trait StoredAction: ActionValue {
    fn table(map: &ActionMap) -> &BTreeMap<String, InputAction<Self>>;
    fn table_mut(map: &mut ActionMap) -> &mut BTreeMap<String, InputAction<Self>>;
}

impl StoredAction for bool {
    fn table(map: &ActionMap) -> &BTreeMap<String, InputAction<Self>> {
        &map.bool_actions
    }

    fn table_mut(map: &mut ActionMap) -> &mut BTreeMap<String, InputAction<Self>> {
        &mut map.bool_actions
    }
}

impl StoredAction for Vec3 {
    fn table(map: &ActionMap) -> &BTreeMap<String, InputAction<Self>> {
        &map.vector_actions
    }

    fn table_mut(map: &mut ActionMap) -> &mut BTreeMap<String, InputAction<Self>> {
        &mut map.vector_actions
    }
}

/// Named registry of bool and vector actions.
///
/// Names are unique across both tables: creating an action under a name
/// that is already taken, by either kind, fails with
/// [`InputError::DuplicateAction`].
#[derive(Debug, Default)]
pub struct ActionMap {
    bool_actions: BTreeMap<String, InputAction<bool>>,
    vector_actions: BTreeMap<String, InputAction<Vec3>>,
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an unbound map from a bindings config.
    pub fn from_config(config: &BindingsConfig) -> Result<Self, InputError> {
        config.validate()?;
        let mut map = Self::new();
        for action in &config.actions {
            match action {
                ActionConfig::Button { name, mappings } => {
                    let created = map.create_action::<bool>(name.as_str())?;
                    for m in mappings {
                        created.map_input(InputMapping::button(m.key).on_device(m.device_index));
                    }
                }
                ActionConfig::Vector {
                    name,
                    composite,
                    mappings,
                } => {
                    let created = map.create_action_with_composite::<Vec3>(name.as_str(), *composite)?;
                    for m in mappings {
                        created.map_input(
                            InputMapping::axis(m.key, m.axis)
                                .with_weight(m.weight)
                                .on_device(m.device_index),
                        );
                    }
                }
            }
        }
        Ok(map)
    }

    pub fn create_action<V: StoredAction>(
        &mut self,
        name: impl Into<String>,
    ) -> Result<&mut InputAction<V>, InputError> {
        self.create_action_with_composite(name, Composite::Value)
    }

    pub fn create_action_with_composite<V: StoredAction>(
        &mut self,
        name: impl Into<String>,
        composite: Composite,
    ) -> Result<&mut InputAction<V>, InputError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(InputError::DuplicateAction(name));
        }
        tracing::debug!(action = %name, ?composite, "action created");
        let action = InputAction::with_composite(name.clone(), composite);
        Ok(V::table_mut(self).entry(name).or_insert(action))
    }

    /// Returns the existing action of type `V` under `name`, creating it if
    /// the name is free. Fails if the name belongs to the other kind.
    pub fn get_or_create_action<V: StoredAction>(
        &mut self,
        name: &str,
    ) -> Result<&mut InputAction<V>, InputError> {
        if V::table(self).contains_key(name) {
            return V::table_mut(self)
                .get_mut(name)
                .ok_or_else(|| InputError::DuplicateAction(name.to_string()));
        }
        self.create_action(name)
    }

    pub fn get_action<V: StoredAction>(&self, name: &str) -> Option<&InputAction<V>> {
        V::table(self).get(name)
    }

    pub fn get_action_mut<V: StoredAction>(&mut self, name: &str) -> Option<&mut InputAction<V>> {
        V::table_mut(self).get_mut(name)
    }

    /// Unbinds and removes an action. Returns `false` if no action of type
    /// `V` has that name.
    pub fn remove_action<V: StoredAction>(&mut self, name: &str, input: &mut InputSystem) -> bool {
        match V::table_mut(self).remove(name) {
            Some(mut action) => {
                action.unbind(input);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bool_actions.contains_key(name) || self.vector_actions.contains_key(name)
    }

    /// Names of every action, in sorted order.
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .bool_actions
            .keys()
            .chain(self.vector_actions.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bool_actions.len() + self.vector_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Binds every action. Returns the total number of mappings bound.
    pub fn bind(&mut self, input: &mut InputSystem) -> usize {
        let bool_bound: usize = self.bool_actions.values_mut().map(|a| a.bind(input)).sum();
        let vector_bound: usize = self.vector_actions.values_mut().map(|a| a.bind(input)).sum();
        tracing::info!(actions = self.len(), mappings = bool_bound + vector_bound, "action map bound");
        bool_bound + vector_bound
    }

    pub fn unbind(&mut self, input: &mut InputSystem) {
        for action in self.bool_actions.values_mut() {
            action.unbind(input);
        }
        for action in self.vector_actions.values_mut() {
            action.unbind(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::InputKey;

    #[test]
    fn create_and_get_by_kind() {
        let mut map = ActionMap::new();
        map.create_action::<bool>("jump").unwrap();
        map.create_action_with_composite::<Vec3>("look", Composite::Delta)
            .unwrap();

        assert!(map.get_action::<bool>("jump").is_some());
        assert!(map.get_action::<Vec3>("jump").is_none());
        assert_eq!(
            map.get_action::<Vec3>("look").map(|a| a.composite()),
            Some(Composite::Delta)
        );
        assert!(map.get_action::<bool>("missing").is_none());
        assert_eq!(map.action_names(), vec!["jump", "look"]);
    }

    #[test]
    fn duplicate_names_are_rejected_across_kinds() {
        let mut map = ActionMap::new();
        map.create_action::<bool>("use").unwrap();
        assert!(matches!(
            map.create_action::<bool>("use"),
            Err(InputError::DuplicateAction(_))
        ));
        assert!(matches!(
            map.create_action::<Vec3>("use"),
            Err(InputError::DuplicateAction(_))
        ));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn get_or_create_returns_the_existing_action() {
        let mut map = ActionMap::new();
        map.create_action::<bool>("jump")
            .unwrap()
            .map_input(InputMapping::button(InputKey::Space));
        let again = map.get_or_create_action::<bool>("jump").unwrap();
        assert_eq!(again.mappings().len(), 1);
        assert!(map.get_or_create_action::<Vec3>("jump").is_err());
    }

    #[test]
    fn bind_reaches_every_action() {
        let mut input = InputSystem::with_desktop_devices();
        let mut map = ActionMap::new();
        map.create_action::<bool>("jump")
            .unwrap()
            .map_input(InputMapping::button(InputKey::Space));
        map.create_action::<Vec3>("move")
            .unwrap()
            .map_input(InputMapping::axis(InputKey::KeyW, Vec3::Z))
            .map_input(InputMapping::axis(InputKey::KeyS, -Vec3::Z));

        assert_eq!(map.bind(&mut input), 3);
        assert_eq!(input.process_callback_count(), 2);

        input.add_key_state(InputKey::KeyW, 1.0);
        input.process_input();
        assert_eq!(map.get_action::<Vec3>("move").unwrap().value(), Vec3::Z);

        map.unbind(&mut input);
        assert_eq!(input.process_callback_count(), 0);
    }

    #[test]
    fn remove_action_unbinds_it() {
        let mut input = InputSystem::with_desktop_devices();
        let mut map = ActionMap::new();
        map.create_action::<bool>("jump")
            .unwrap()
            .map_input(InputMapping::button(InputKey::Space));
        map.bind(&mut input);

        assert!(map.remove_action::<bool>("jump", &mut input));
        assert!(!map.remove_action::<bool>("jump", &mut input));
        assert_eq!(input.process_callback_count(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn from_config_builds_camera_layout() {
        let map = ActionMap::from_config(&BindingsConfig::camera_defaults()).unwrap();
        assert!(map.get_action::<Vec3>("move").is_some());
        assert_eq!(
            map.get_action::<Vec3>("look").map(|a| a.composite()),
            Some(Composite::Delta)
        );
        assert!(map.get_action::<bool>("drag").is_some());
    }
}
