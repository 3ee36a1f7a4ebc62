//! Handle-based object storage and the component model built on it.
//!
//! The [`Arena`] is the slot allocator everything else sits on: component
//! systems, scene actors and render resources all address their objects by
//! never-reused handles into one.
//!
//! # Invariants
//! - A live handle maps to exactly one slot; a slot is either free or owned
//!   by exactly one live handle.
//! - Handle values are unique for the lifetime of their arena.
//! - Unknown handles are reported through `bool`/`Option`, never a panic.
//! - Each component type lives in its own homogeneous system.

pub mod arena;
mod component;
mod scene;
mod system;

pub use arena::Arena;
pub use component::{
    ComponentKind, ComponentRef, Draw, DrawRequest, MeshRenderer, PhysicsTick, Spatial, Spinner,
    Tick,
};
pub use scene::{Actor, ActorKind, Scene, SceneEvent};
pub use system::ComponentSystem;

pub fn crate_info() -> &'static str {
    "kestrel-ecs v0.1.0"
}
