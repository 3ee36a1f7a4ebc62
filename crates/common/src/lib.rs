//! Shared types used across the kestrel crates.
//!
//! # Invariants
//! - Handles are plain integer newtypes; equality is identity.
//! - Nothing in this crate owns storage.

mod handle;
mod types;

pub use handle::{ActorHandle, ComponentHandle, Handle, MaterialHandle, MeshHandle, ShaderHandle};
pub use types::Transform;

pub fn crate_info() -> &'static str {
    "kestrel-common v0.1.0"
}
