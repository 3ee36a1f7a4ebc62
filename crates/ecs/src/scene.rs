use glam::Vec3;
use kestrel_common::{ActorHandle, ComponentHandle, MaterialHandle, MeshHandle, Transform};
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::component::{ComponentKind, ComponentRef, DrawRequest, MeshRenderer, Spatial, Spinner};
use crate::system::ComponentSystem;

/// What an actor is. Decides which components it creates on spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    /// No components at all.
    Empty,
    /// A viewpoint: spatial only.
    Camera,
    /// A drawable object, optionally spinning around `spin_axis`.
    Prop {
        mesh: MeshHandle,
        material: MaterialHandle,
        spin_axis: Vec3,
        spin_speed: f32,
    },
}

impl ActorKind {
    pub fn prop(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self::Prop {
            mesh,
            material,
            spin_axis: Vec3::Y,
            spin_speed: 0.0,
        }
    }
}

/// An actor: a name plus the handles of the components it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub name: String,
    pub kind: ActorKind,
    components: Vec<ComponentRef>,
}

impl Actor {
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// First component of `kind` owned by this actor.
    pub fn component(&self, kind: ComponentKind) -> Option<ComponentHandle> {
        self.components
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.handle)
    }
}

/// Events produced by scene mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ActorSpawned { actor: ActorHandle, name: String },
    ActorDespawned { actor: ActorHandle, name: String },
}

/// Actors plus one typed system per component kind.
///
/// Actors never own component data directly; they hold handles into the
/// systems, which keep each component type in its own contiguous arena.
#[derive(Default)]
pub struct Scene {
    actors: Arena<ActorHandle, Actor>,
    spatials: ComponentSystem<Spatial>,
    mesh_renderers: ComponentSystem<MeshRenderer>,
    spinners: ComponentSystem<Spinner>,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an actor and runs its on-create hook.
    pub fn spawn(&mut self, name: impl Into<String>, kind: ActorKind, transform: Transform) -> ActorHandle {
        let name = name.into();
        let components = self.on_create(kind, transform);
        let (actor, _) = self.actors.create_object(Actor {
            name: name.clone(),
            kind,
            components,
        });
        tracing::debug!(%actor, %name, "actor spawned");
        self.events.push(SceneEvent::ActorSpawned { actor, name });
        actor
    }

    /// Runs the on-destroy hook and removes the actor. Returns `false` for
    /// an unknown handle.
    pub fn despawn(&mut self, actor: ActorHandle) -> bool {
        let Some(removed) = self.actors.remove_object(actor) else {
            return false;
        };
        self.on_destroy(&removed);
        tracing::debug!(%actor, name = %removed.name, "actor despawned");
        self.events.push(SceneEvent::ActorDespawned {
            actor,
            name: removed.name,
        });
        true
    }

    fn on_create(&mut self, kind: ActorKind, transform: Transform) -> Vec<ComponentRef> {
        let mut components = Vec::new();
        match kind {
            ActorKind::Empty => {}
            ActorKind::Camera => {
                components.push(self.add_spatial(transform));
            }
            ActorKind::Prop {
                mesh,
                material,
                spin_axis,
                spin_speed,
            } => {
                components.push(self.add_spatial(transform));
                components.push(ComponentRef {
                    kind: ComponentKind::MeshRenderer,
                    handle: self
                        .mesh_renderers
                        .create_component(MeshRenderer::single(mesh, material)),
                });
                if spin_speed != 0.0 {
                    components.push(ComponentRef {
                        kind: ComponentKind::Spinner,
                        handle: self
                            .spinners
                            .create_component(Spinner::new(spin_axis, spin_speed)),
                    });
                }
            }
        }
        components
    }

    fn add_spatial(&mut self, transform: Transform) -> ComponentRef {
        ComponentRef {
            kind: ComponentKind::Spatial,
            handle: self.spatials.create_component(Spatial {
                transform,
                velocity: Vec3::ZERO,
            }),
        }
    }

    fn on_destroy(&mut self, actor: &Actor) {
        for component in &actor.components {
            let destroyed = match component.kind {
                ComponentKind::Spatial => self.spatials.destroy_component(component.handle),
                ComponentKind::MeshRenderer => {
                    self.mesh_renderers.destroy_component(component.handle)
                }
                ComponentKind::Spinner => self.spinners.destroy_component(component.handle),
            };
            if !destroyed {
                tracing::warn!(?component, "actor referenced a component that was already gone");
            }
        }
    }

    pub fn actor(&self, actor: ActorHandle) -> Option<&Actor> {
        self.actors.get_object(actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = (ActorHandle, &Actor)> {
        self.actors.iter()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn spatial(&self, actor: ActorHandle) -> Option<&Spatial> {
        let handle = self.actor(actor)?.component(ComponentKind::Spatial)?;
        self.spatials.get_component(handle)
    }

    pub fn spatial_mut(&mut self, actor: ActorHandle) -> Option<&mut Spatial> {
        let handle = self.actor(actor)?.component(ComponentKind::Spatial)?;
        self.spatials.get_component_mut(handle)
    }

    pub fn spatials(&self) -> &ComponentSystem<Spatial> {
        &self.spatials
    }

    pub fn mesh_renderers(&self) -> &ComponentSystem<MeshRenderer> {
        &self.mesh_renderers
    }

    /// Variable-rate update: ticks spinners and applies their rotation.
    pub fn tick(&mut self, dt: f32) {
        self.spinners.tick_all(dt);
        for (_, actor) in self.actors.iter() {
            let (Some(spinner), Some(spatial)) = (
                actor.component(ComponentKind::Spinner),
                actor.component(ComponentKind::Spatial),
            ) else {
                continue;
            };
            let rotation = match self.spinners.get_component_mut(spinner) {
                Some(s) => s.take_rotation(),
                None => continue,
            };
            if let Some(s) = self.spatials.get_component_mut(spatial) {
                s.rotate(rotation);
            }
        }
    }

    /// Fixed-rate update.
    pub fn physics_tick(&mut self, dt: f32) {
        self.spatials.physics_tick_all(dt);
    }

    /// Draw requests for every actor that has both a spatial and a renderer.
    pub fn draw_list(&self) -> Vec<DrawRequest> {
        let mut out = Vec::new();
        for (_, actor) in self.actors.iter() {
            let (Some(renderer), Some(spatial)) = (
                actor.component(ComponentKind::MeshRenderer),
                actor.component(ComponentKind::Spatial),
            ) else {
                continue;
            };
            if let Some(spatial) = self.spatials.get_component(spatial) {
                self.mesh_renderers.draw(renderer, &spatial.transform, &mut out);
            }
        }
        out
    }

    /// Drain and return pending scene events.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_prop() -> ActorKind {
        ActorKind::prop(MeshHandle(0), MaterialHandle(0))
    }

    #[test]
    fn camera_actor_gets_a_spatial() {
        let mut scene = Scene::new();
        let cam = scene.spawn("camera", ActorKind::Camera, Transform::default());
        assert!(scene.spatial(cam).is_some());
        assert_eq!(scene.actor(cam).unwrap().components().len(), 1);
        assert!(scene.draw_list().is_empty());
    }

    #[test]
    fn despawn_destroys_owned_components() {
        let mut scene = Scene::new();
        let prop = scene.spawn("cube", cube_prop(), Transform::default());
        assert_eq!(scene.spatials().len(), 1);
        assert_eq!(scene.mesh_renderers().len(), 1);

        assert!(scene.despawn(prop));
        assert_eq!(scene.spatials().len(), 0);
        assert_eq!(scene.mesh_renderers().len(), 0);
        assert!(!scene.despawn(prop));
    }

    #[test]
    fn draw_list_uses_actor_transform() {
        let mut scene = Scene::new();
        let at = Transform::from_position(Vec3::new(3.0, 0.0, 0.0));
        scene.spawn("cube", cube_prop(), at);
        let draws = scene.draw_list();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].transform.position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn physics_tick_moves_by_velocity() {
        let mut scene = Scene::new();
        let cube = scene.spawn("cube", cube_prop(), Transform::default());
        scene.spatial_mut(cube).unwrap().velocity = Vec3::Z;
        scene.physics_tick(2.0);
        assert_eq!(scene.spatial(cube).unwrap().transform.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn tick_applies_spin() {
        let mut scene = Scene::new();
        let kind = ActorKind::Prop {
            mesh: MeshHandle(0),
            material: MaterialHandle(0),
            spin_axis: Vec3::Y,
            spin_speed: 1.0,
        };
        let cube = scene.spawn("spinner", kind, Transform::default());
        scene.tick(0.5);
        let rotation = scene.spatial(cube).unwrap().transform.rotation;
        assert!((rotation.to_axis_angle().1 - 0.5).abs() < 1e-5);
    }

    #[test]
    fn events_record_spawn_and_despawn() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", ActorKind::Empty, Transform::default());
        scene.despawn(a);
        let events = scene.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SceneEvent::ActorDespawned { .. }));
        assert!(scene.events().is_empty());
    }
}
