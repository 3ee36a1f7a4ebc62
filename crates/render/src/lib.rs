//! Render-side data: resources, frames and the submission interface.
//!
//! # Invariants
//! - Shaders, materials and meshes are addressed by arena handles and can be
//!   enumerated as `(handle, resource)` pairs.
//! - A material only ever references a vertex shader and a fragment shader
//!   that existed when it was created.
//! - Renderers read a [`Frame`]; they never mutate scene or input state.

mod camera;
mod error;
mod frame;
mod renderer;
mod resources;

pub use camera::FlyCamera;
pub use error::RenderError;
pub use frame::{DrawItem, Frame};
pub use renderer::{DebugTextRenderer, Renderer};
pub use resources::{Material, Mesh, ResourceRegistry, Shader, ShaderStage};

pub fn crate_info() -> &'static str {
    "kestrel-render v0.1.0"
}
