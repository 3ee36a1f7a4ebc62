use glam::{Mat4, Vec3};

/// Free-flying perspective camera driven by yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second at full input.
    pub speed: f32,
    /// Radians per unit of look input.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        // Six units in front of the origin, looking at it.
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            speed: 4.0,
            sensitivity: 0.003,
        }
    }
}

impl FlyCamera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Moves along camera-local axes: x right, y world up, z forward.
    /// `local` is scaled by `speed * dt`.
    pub fn fly(&mut self, local: Vec3, dt: f32) {
        let step = self.right() * local.x + Vec3::Y * local.y + self.forward() * local.z;
        self.position += step * self.speed * dt;
    }

    /// Turns by raw look input. Positive `dx` turns right, positive `dy`
    /// looks down. Pitch stays short of straight up or down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let limit = 89.0_f32.to_radians();
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-limit, limit);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
