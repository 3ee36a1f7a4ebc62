use std::time::Duration;

use glam::Vec3;
use kestrel_common::{ActorHandle, Transform};
use kestrel_ecs::{ActorKind, Scene};
use kestrel_input::{ActionMap, BindingsConfig, InputSystem};
use kestrel_render::{DrawItem, FlyCamera, Frame, Renderer, ResourceRegistry};

use crate::clock::FrameClock;
use crate::config::EngineConfig;
use crate::controller::CameraController;
use crate::error::EngineError;

/// What one call to [`Engine::run_frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Keys whose committed value changed this frame.
    pub input_changes: usize,
    /// Delta handed to the update phase, if the update clock ticked.
    pub update: Option<Duration>,
    /// Delta handed to the physics phase, if the physics clock ticked.
    pub physics: Option<Duration>,
    /// Scene events drained this frame.
    pub scene_events: usize,
    /// Draw items submitted, if a frame was submitted.
    pub submitted: Option<usize>,
}

/// Owns input, actions, scene, resources and camera, and runs them in a
/// fixed per-frame order: input, update, physics, submit.
pub struct Engine {
    config: EngineConfig,
    input: InputSystem,
    actions: ActionMap,
    scene: Scene,
    resources: ResourceRegistry,
    camera: FlyCamera,
    controller: CameraController,
    update_clock: FrameClock,
    physics_clock: FrameClock,
    frames_submitted: u64,
}

impl Engine {
    /// Builds an engine with keyboard and mouse registered and every action
    /// from `bindings` bound.
    pub fn new(config: EngineConfig, bindings: &BindingsConfig) -> Result<Self, EngineError> {
        let mut input = InputSystem::with_desktop_devices();
        let mut actions = ActionMap::from_config(bindings)?;
        let controller = CameraController::new(config.camera);
        controller.attach(&mut actions)?;
        actions.bind(&mut input);

        let mut camera = FlyCamera::default();
        controller.configure(&mut camera);

        tracing::info!(
            update_rate = config.update_rate,
            physics_rate = config.physics_rate,
            actions = actions.len(),
            "engine created"
        );

        Ok(Self {
            update_clock: FrameClock::new(config.update_rate),
            physics_clock: FrameClock::new(config.physics_rate),
            config,
            input,
            actions,
            scene: Scene::new(),
            resources: ResourceRegistry::new(),
            camera,
            controller,
            frames_submitted: 0,
        })
    }

    /// Engine with default config and the built-in camera bindings.
    pub fn with_defaults() -> Result<Self, EngineError> {
        Self::new(EngineConfig::default(), &BindingsConfig::camera_defaults())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Device-event ingress for platform code.
    pub fn input_mut(&mut self) -> &mut InputSystem {
        &mut self.input
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn actions(&self) -> &ActionMap {
        &self.actions
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.resources
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Registers placeholder cube shaders and spawns a spinning cube at
    /// `position`.
    pub fn spawn_demo_cube(&mut self, position: Vec3) -> Result<ActorHandle, EngineError> {
        let (material, mesh) = self
            .resources
            .create_default_cube(b"cube-vert".to_vec(), b"cube-frag".to_vec())?;
        let kind = ActorKind::Prop {
            mesh,
            material,
            spin_axis: Vec3::Y,
            spin_speed: 1.0,
        };
        Ok(self
            .scene
            .spawn("cube", kind, Transform::from_position(position)))
    }

    /// Runs one frame using wall-clock time.
    pub fn run_frame(&mut self, renderer: &mut impl Renderer) -> Result<FrameReport, EngineError> {
        let update = self.update_clock.tick();
        let physics = self.physics_clock.tick();
        self.step(update, physics, renderer)
    }

    /// Runs one frame as if `elapsed` had passed since the previous one.
    pub fn run_frame_with(
        &mut self,
        elapsed: Duration,
        renderer: &mut impl Renderer,
    ) -> Result<FrameReport, EngineError> {
        let update = self.update_clock.advance(elapsed);
        let physics = self.physics_clock.advance(elapsed);
        self.step(update, physics, renderer)
    }

    fn step(
        &mut self,
        update: Option<Duration>,
        physics: Option<Duration>,
        renderer: &mut impl Renderer,
    ) -> Result<FrameReport, EngineError> {
        let _span = tracing::info_span!("engine_frame", frame = self.frames_submitted).entered();

        let changes = self.input.process_input();
        let mut report = FrameReport {
            input_changes: changes.len(),
            update,
            physics,
            scene_events: 0,
            submitted: None,
        };

        if let Some(dt) = update {
            let dt = dt.as_secs_f32();
            self.controller.update(&mut self.camera, dt);
            self.scene.tick(dt);
        }

        if let Some(dt) = physics {
            self.scene.physics_tick(dt.as_secs_f32());
        }

        let events = self.scene.drain_events();
        for event in &events {
            tracing::debug!(?event, "scene event");
        }
        report.scene_events = events.len();

        if let Some(dt) = update {
            let frame = self.build_frame(dt);
            renderer.submit(&frame)?;
            self.frames_submitted += 1;
            report.submitted = Some(frame.draw_count());
        }

        Ok(report)
    }

    fn build_frame(&self, delta: Duration) -> Frame {
        let mut frame = Frame::new(
            self.frames_submitted,
            delta,
            self.camera.position,
            self.camera.view_projection(),
        );
        for request in self.scene.draw_list() {
            if self.resources.mesh(request.mesh).is_none() {
                tracing::warn!(mesh = %request.mesh, "draw request for unknown mesh skipped");
                continue;
            }
            frame.push(DrawItem {
                mesh: request.mesh,
                material: request.material,
                model: request.transform.matrix(),
            });
        }
        frame
    }

    /// Unbinds every action from the input system.
    pub fn shutdown(&mut self) {
        self.actions.unbind(&mut self.input);
        tracing::info!(frames = self.frames_submitted, "engine shut down");
    }
}
