use glam::{Quat, Vec3};
use kestrel_common::{ComponentHandle, MaterialHandle, MeshHandle, Transform};
use serde::{Deserialize, Serialize};

/// Per-frame update capability.
pub trait Tick {
    fn tick(&mut self, dt: f32);
}

/// Fixed-rate simulation capability.
pub trait PhysicsTick {
    fn physics_tick(&mut self, dt: f32);
}

/// Draw capability: emits draw requests for the owning actor's transform.
pub trait Draw {
    fn draw(&self, transform: &Transform, out: &mut Vec<DrawRequest>);
}

/// One mesh/material pair to draw at a model transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub transform: Transform,
}

/// The closed set of component variants a scene knows how to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Spatial,
    MeshRenderer,
    Spinner,
}

/// A component owned by an actor: its kind plus its handle in that kind's system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    pub kind: ComponentKind,
    pub handle: ComponentHandle,
}

/// Placement and motion of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spatial {
    pub transform: Transform,
    /// World-space units per second.
    pub velocity: Vec3,
}

impl Spatial {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            velocity: Vec3::ZERO,
        }
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.transform.translate(offset);
        self
    }

    pub fn rotate(&mut self, rotation: Quat) -> &mut Self {
        self.transform.rotate(rotation);
        self
    }
}

impl PhysicsTick for Spatial {
    fn physics_tick(&mut self, dt: f32) {
        if self.velocity != Vec3::ZERO {
            self.transform.position += self.velocity * dt;
        }
    }
}

/// Renders meshes with their materials. Meshes without a matching material
/// reuse the last material in the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshRenderer {
    pub meshes: Vec<MeshHandle>,
    pub materials: Vec<MaterialHandle>,
}

impl MeshRenderer {
    pub fn single(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            meshes: vec![mesh],
            materials: vec![material],
        }
    }
}

impl Draw for MeshRenderer {
    fn draw(&self, transform: &Transform, out: &mut Vec<DrawRequest>) {
        let Some(fallback) = self.materials.last().copied() else {
            return;
        };
        for (i, mesh) in self.meshes.iter().enumerate() {
            out.push(DrawRequest {
                mesh: *mesh,
                material: self.materials.get(i).copied().unwrap_or(fallback),
                transform: *transform,
            });
        }
    }
}

/// Spins its actor around a fixed axis. Rotation accumulates on tick and is
/// handed to the actor's spatial by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spinner {
    pub axis: Vec3,
    pub radians_per_second: f32,
    #[serde(skip)]
    pending: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(Vec3::Y, 0.0)
    }
}

impl Spinner {
    pub fn new(axis: Vec3, radians_per_second: f32) -> Self {
        Self {
            axis: axis.normalize_or_zero(),
            radians_per_second,
            pending: 0.0,
        }
    }

    /// Rotation accumulated since the last call.
    pub fn take_rotation(&mut self) -> Quat {
        let angle = std::mem::take(&mut self.pending);
        if angle == 0.0 || self.axis == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_axis_angle(self.axis, angle)
        }
    }
}

impl Tick for Spinner {
    fn tick(&mut self, dt: f32) {
        self.pending += self.radians_per_second * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_integrates_velocity() {
        let mut s = Spatial::at(Vec3::ZERO);
        s.velocity = Vec3::new(2.0, 0.0, 0.0);
        s.physics_tick(0.5);
        assert_eq!(s.transform.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn mesh_renderer_falls_back_to_last_material() {
        let r = MeshRenderer {
            meshes: vec![MeshHandle(0), MeshHandle(1)],
            materials: vec![MaterialHandle(5)],
        };
        let mut out = Vec::new();
        r.draw(&Transform::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|d| d.material == MaterialHandle(5)));
    }

    #[test]
    fn mesh_renderer_without_materials_draws_nothing() {
        let r = MeshRenderer {
            meshes: vec![MeshHandle(0)],
            materials: vec![],
        };
        let mut out = Vec::new();
        r.draw(&Transform::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn spinner_hands_out_accumulated_rotation_once() {
        let mut s = Spinner::new(Vec3::Y, 1.0);
        s.tick(0.25);
        s.tick(0.25);
        let q = s.take_rotation();
        let (axis, angle) = q.to_axis_angle();
        assert!((angle - 0.5).abs() < 1e-5);
        assert!((axis - Vec3::Y).length() < 1e-5);
        assert_eq!(s.take_rotation(), Quat::IDENTITY);
    }
}
