use std::fmt::Write as _;

use crate::error::RenderError;
use crate::frame::Frame;

/// Frame submission interface. Renderers only read the frame they are
/// handed; they never reach back into scene or input state.
pub trait Renderer {
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Renderer that prints each submitted frame as text.
///
/// Stands in for a GPU backend in the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    last_output: String,
    frames_submitted: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the most recently submitted frame.
    pub fn last_output(&self) -> &str {
        &self.last_output
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    fn describe(frame: &Frame) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (dt={:.2}ms) ===",
            frame.index,
            frame.delta.as_secs_f64() * 1000.0
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2})",
            frame.eye.x, frame.eye.y, frame.eye.z
        );
        let _ = writeln!(out, "Draws: {}", frame.draw_count());
        for draw in &frame.draws {
            let p = draw.model.w_axis;
            let _ = writeln!(
                out,
                "  {} / {} pos=({:.2}, {:.2}, {:.2})",
                draw.mesh, draw.material, p.x, p.y, p.z
            );
        }
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.last_output = Self::describe(frame);
        self.frames_submitted += 1;
        tracing::trace!(frame = frame.index, draws = frame.draw_count(), "frame submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::DrawItem;
    use glam::{Mat4, Vec3};
    use kestrel_common::{MaterialHandle, MeshHandle};
    use std::time::Duration;

    #[test]
    fn empty_frame() {
        let mut renderer = DebugTextRenderer::new();
        let frame = Frame::new(0, Duration::ZERO, Vec3::ZERO, Mat4::IDENTITY);
        renderer.submit(&frame).unwrap();
        assert!(renderer.last_output().contains("Frame 0"));
        assert!(renderer.last_output().contains("Draws: 0"));
        assert_eq!(renderer.frames_submitted(), 1);
    }

    #[test]
    fn frame_with_draws() {
        let mut renderer = DebugTextRenderer::new();
        let mut frame = Frame::new(3, Duration::from_millis(16), Vec3::new(0.0, 0.0, 6.0), Mat4::IDENTITY);
        frame.push(DrawItem {
            mesh: MeshHandle(1),
            material: MaterialHandle(0),
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        });
        renderer.submit(&frame).unwrap();

        let out = renderer.last_output();
        assert!(out.contains("Draws: 1"));
        assert!(out.contains("MeshHandle#1"));
        assert!(out.contains("pos=(1.00, 2.00, 3.00)"));
    }
}
