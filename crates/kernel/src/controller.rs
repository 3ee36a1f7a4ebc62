use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use kestrel_input::{ActionMap, EventContext};
use kestrel_render::FlyCamera;

use crate::config::CameraConfig;
use crate::error::EngineError;

/// What the bound actions asked the camera to do since the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CameraIntent {
    movement: Vec3,
    look: Vec3,
    dragging: bool,
    sprinting: bool,
}

/// Drives a [`FlyCamera`] from the `move`, `look`, `drag` and `sprint`
/// actions.
///
/// Action handlers only record intent; the camera itself changes in
/// [`CameraController::update`], during the update phase.
#[derive(Debug)]
pub struct CameraController {
    config: CameraConfig,
    intent: Rc<RefCell<CameraIntent>>,
}

impl CameraController {
    pub const MOVE: &'static str = "move";
    pub const LOOK: &'static str = "look";
    pub const DRAG: &'static str = "drag";
    pub const SPRINT: &'static str = "sprint";

    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            intent: Rc::new(RefCell::new(CameraIntent::default())),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Installs handlers on the map's camera actions. `move` and `look` are
    /// required; `drag` and `sprint` are optional.
    pub fn attach(&self, actions: &mut ActionMap) -> Result<(), EngineError> {
        let movement = actions
            .get_action_mut::<Vec3>(Self::MOVE)
            .ok_or_else(|| missing(Self::MOVE, "vector"))?;
        let intent = Rc::clone(&self.intent);
        let on_move = move |_: &EventContext, value: Vec3| intent.borrow_mut().movement = value;
        movement
            .on_started(on_move.clone())
            .on_performed(on_move.clone())
            .on_canceled(on_move);

        let look = actions
            .get_action_mut::<Vec3>(Self::LOOK)
            .ok_or_else(|| missing(Self::LOOK, "vector"))?;
        let intent = Rc::clone(&self.intent);
        let requires_drag = self.config.look_requires_drag;
        look.on_performed(move |_, value| {
            let mut intent = intent.borrow_mut();
            if intent.dragging || !requires_drag {
                intent.look += value;
            }
        });

        self.attach_flag(actions, Self::DRAG, |intent, held| intent.dragging = held);
        self.attach_flag(actions, Self::SPRINT, |intent, held| intent.sprinting = held);
        Ok(())
    }

    fn attach_flag(&self, actions: &mut ActionMap, name: &str, set: fn(&mut CameraIntent, bool)) {
        let Some(action) = actions.get_action_mut::<bool>(name) else {
            tracing::debug!(action = name, "optional camera action not bound");
            return;
        };
        let on = Rc::clone(&self.intent);
        let off = Rc::clone(&self.intent);
        action
            .on_started(move |_, _| set(&mut on.borrow_mut(), true))
            .on_canceled(move |_, _| set(&mut off.borrow_mut(), false));
    }

    /// Applies pending intent to `camera`. Look input is consumed; movement
    /// persists until its action changes.
    pub fn update(&self, camera: &mut FlyCamera, dt: f32) {
        let mut intent = self.intent.borrow_mut();
        let look = std::mem::take(&mut intent.look);
        if look != Vec3::ZERO {
            camera.rotate(look.x, look.y);
        }
        if intent.movement != Vec3::ZERO {
            let boost = if intent.sprinting {
                self.config.sprint_multiplier
            } else {
                1.0
            };
            camera.fly(intent.movement * boost, dt);
        }
    }

    /// Writes the configured tuning into `camera`.
    pub fn configure(&self, camera: &mut FlyCamera) {
        camera.speed = self.config.speed;
        camera.sensitivity = self.config.sensitivity;
        camera.fov = self.config.fov_degrees.to_radians();
    }

    pub fn is_dragging(&self) -> bool {
        self.intent.borrow().dragging
    }

    pub fn movement(&self) -> Vec3 {
        self.intent.borrow().movement
    }
}

fn missing(name: &str, kind: &'static str) -> EngineError {
    EngineError::MissingAction {
        name: name.to_string(),
        kind,
    }
}
