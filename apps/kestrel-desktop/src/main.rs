mod keymap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use glam::{DVec2, Vec3};
use kestrel_input::{BindingsConfig, InputKey};
use kestrel_kernel::{Engine, EngineConfig};
use kestrel_render::DebugTextRenderer;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "kestrel-desktop", about = "Kestrel desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Action bindings JSON (defaults to the built-in camera layout)
    #[arg(long)]
    bindings: Option<PathBuf>,
}

struct App {
    engine: Engine,
    renderer: DebugTextRenderer,
    window: Option<Arc<Window>>,
    /// Raw mouse motion gathered since the last frame.
    motion: DVec2,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            renderer: DebugTextRenderer::new(),
            window: None,
            motion: DVec2::ZERO,
            error: None,
        }
    }

    fn feed(&mut self, key: InputKey, value: f32) {
        self.engine.input_mut().add_key_state(key, value);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let motion = std::mem::take(&mut self.motion);
        self.feed(InputKey::MouseMoveX, motion.x as f32);
        self.feed(InputKey::MouseMoveY, motion.y as f32);

        match self.engine.run_frame(&mut self.renderer) {
            Ok(report) => {
                if report.submitted.is_some() && self.renderer.frames_submitted() % 120 == 0 {
                    tracing::debug!("{}", self.renderer.last_output());
                }
            }
            Err(e) => {
                tracing::error!("frame failed: {e}");
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        }

        if let Some(window) = &self.window {
            let eye = self.engine.camera().position;
            window.set_title(&format!(
                "Kestrel ({:.1}, {:.1}, {:.1})",
                eye.x, eye.y, eye.z
            ));
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Kestrel")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.engine.camera_mut().set_aspect(size.width, size.height);
        self.window = Some(window);
        tracing::info!(width = size.width, height = size.height, "window created");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.engine.camera_mut().set_aspect(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                }
                if let Some(key) = keymap::translate_key(code) {
                    self.feed(key, keymap::state_value(state));
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(key) = keymap::translate_button(button) {
                    self.feed(key, keymap::state_value(state));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.feed(InputKey::MousePosX, position.x as f32);
                self.feed(InputKey::MousePosY, position.y as f32);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.motion += DVec2::new(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("kestrel-desktop starting");

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let bindings = match &cli.bindings {
        Some(path) => BindingsConfig::load(path)?,
        None => BindingsConfig::camera_defaults(),
    };

    let mut engine = Engine::new(config, &bindings)?;
    engine.spawn_demo_cube(Vec3::ZERO)?;
    engine.spawn_demo_cube(Vec3::new(3.0, 0.0, 0.0))?;
    engine.spawn_demo_cube(Vec3::new(-3.0, 0.0, 3.0))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(engine);
    event_loop.run_app(&mut app)?;

    app.engine.shutdown();
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
