//! Engine kernel: frame clocks, configuration, camera control and the frame
//! loop that ties input, scene and rendering together.
//!
//! # Invariants
//! - Within a frame, device flush and action evaluation happen before any
//!   update, update happens before physics, and physics before submission.
//! - Update and physics run on independent clocks.
//! - A frame is submitted only on frames where the update clock ticked.

mod clock;
mod config;
mod controller;
mod engine;
mod error;

pub use clock::FrameClock;
pub use config::{CameraConfig, EngineConfig};
pub use controller::CameraController;
pub use engine::{Engine, FrameReport};
pub use error::EngineError;

pub fn crate_info() -> &'static str {
    "kestrel-kernel v0.1.0"
}
