use std::time::Duration;

use glam::{Mat4, Vec3};
use kestrel_common::{MaterialHandle, MeshHandle};

/// One mesh drawn with one material at one model matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub model: Mat4,
}

/// Everything a renderer needs to present one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Time covered by the update that produced this frame.
    pub delta: Duration,
    pub eye: Vec3,
    pub view_proj: Mat4,
    pub draws: Vec<DrawItem>,
}

impl Frame {
    pub fn new(index: u64, delta: Duration, eye: Vec3, view_proj: Mat4) -> Self {
        Self {
            index,
            delta,
            eye,
            view_proj,
            draws: Vec::new(),
        }
    }

    pub fn push(&mut self, item: DrawItem) {
        self.draws.push(item);
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }
}
