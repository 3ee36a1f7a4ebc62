use kestrel_common::{ComponentHandle, Transform};

use crate::arena::Arena;
use crate::component::{Draw, DrawRequest, PhysicsTick, Tick};

/// Owns every component of one type in a single arena.
///
/// Capability dispatch (`tick_all`, `physics_tick_all`) is only available
/// when the component type implements the matching trait, so each system
/// walks one homogeneous slot vector.
pub struct ComponentSystem<C> {
    arena: Arena<ComponentHandle, C>,
}

impl<C> Default for ComponentSystem<C> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
}

impl<C> ComponentSystem<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_component(&mut self, component: C) -> ComponentHandle {
        let (handle, _) = self.arena.create_object(component);
        handle
    }

    /// Returns `false` when the handle is unknown.
    pub fn destroy_component(&mut self, handle: ComponentHandle) -> bool {
        self.arena.destroy_object(handle)
    }

    pub fn get_component(&self, handle: ComponentHandle) -> Option<&C> {
        self.arena.get_object(handle)
    }

    pub fn get_component_mut(&mut self, handle: ComponentHandle) -> Option<&mut C> {
        self.arena.get_object_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentHandle, &C)> {
        self.arena.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ComponentHandle, &mut C)> {
        self.arena.iter_mut()
    }
}

impl<C: Tick> ComponentSystem<C> {
    pub fn tick_all(&mut self, dt: f32) {
        for (_, component) in self.arena.iter_mut() {
            component.tick(dt);
        }
    }
}

impl<C: PhysicsTick> ComponentSystem<C> {
    pub fn physics_tick_all(&mut self, dt: f32) {
        for (_, component) in self.arena.iter_mut() {
            component.physics_tick(dt);
        }
    }
}

impl<C: Draw> ComponentSystem<C> {
    /// Draws one component at `transform`. Unknown handles draw nothing.
    pub fn draw(&self, handle: ComponentHandle, transform: &Transform, out: &mut Vec<DrawRequest>) {
        if let Some(component) = self.arena.get_object(handle) {
            component.draw(transform, out);
        }
    }
}
