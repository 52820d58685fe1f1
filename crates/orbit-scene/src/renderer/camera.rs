use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera placement and pointer parallax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// World units of camera offset per unit of pointer.
    pub parallax: [f32; 2],
    /// Follow smoothing (0.0 = instant, 0.99 = very slow).
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 15.0],
            target: [0.0, 0.0, 0.0],
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            parallax: [0.0, 0.0],
            smoothing: 0.9,
        }
    }
}

/// Perspective camera looking at a fixed target, nudged by the pointer.
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Rest position in world space.
    pub home: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub parallax: Vec2,
    /// Current parallax offset, smoothed toward the pointer-driven goal.
    pub offset: Vec2,
    pub smoothing: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// xyz = eye position, w = unused.
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 20;
}

impl Camera3D {
    pub fn new(config: &CameraConfig) -> Self {
        let fov = if config.fov > 1.0 && config.fov < 179.0 {
            config.fov
        } else {
            log::warn!("camera fov {} out of range, using 75", config.fov);
            75.0
        };
        let near = config.near.max(1e-3);
        Self {
            home: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            fov_degrees: fov,
            near,
            far: config.far.max(near + 1.0),
            aspect: 16.0 / 9.0,
            parallax: Vec2::from_array(config.parallax),
            offset: Vec2::ZERO,
            smoothing: config.smoothing.clamp(0.0, 0.99),
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.home + Vec3::new(self.offset.x, self.offset.y, 0.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_projection: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 0.0],
        }
    }

    /// Resize on viewport change. Degenerate sizes are ignored.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_width > 0.0 && viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    /// Ease the parallax offset toward `pointer * parallax`.
    /// Call each frame with the normalized pointer.
    pub fn follow(&mut self, pointer: Vec2, dt: f32) {
        let goal = pointer * self.parallax;
        if self.smoothing <= 0.0 {
            self.offset = goal;
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.offset += (goal - self.offset) * lerp_factor;
        }
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
