//! Device state tracking and the input-action layer built on top of it.
//!
//! Platform code feeds raw samples into [`Device`] buffers through the
//! [`InputSystem`]. Once per frame [`InputSystem::process_input`] commits
//! them, fires per-key listeners for genuine changes, then lets every bound
//! [`InputAction`] evaluate its started/performed/canceled edges.
//!
//! # Invariants
//! - Committed device state only changes inside `process_input`.
//! - A listener fires only when a key's committed value actually changes.
//! - All device flushes of a frame happen before any action evaluates.
//! - Listener and process handles are generation checked; stale handles are
//!   rejected, never misapplied.
//! - Action names are unique within an [`ActionMap`].

pub mod action;
pub mod bindings;
mod callback;
pub mod device;
mod error;
pub mod key;
mod map;
mod system;
pub mod value;

pub use action::{ActionHandler, EventContext, InputAction};
pub use bindings::{ActionConfig, BindingsConfig};
pub use callback::CallbackId;
pub use device::{Device, DeviceStateMap, ListenerHandle, StateListener};
pub use error::InputError;
pub use key::{InputDeviceState, InputDeviceType, InputKey};
pub use map::{ActionMap, StoredAction};
pub use system::{InputSystem, ProcessHandle};
pub use value::{ActionValue, Composite, InputMapping};

pub fn crate_info() -> &'static str {
    "kestrel-input v0.1.0"
}
