//! Orbit camera and projections.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Radians of rotation per pixel of pointer drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Keeps the camera above the ring plane and off the pole.
const MIN_PITCH: f32 = 0.0;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera looking at the ring.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the ring plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    min_distance: f32,
    max_distance: f32,
    zoom_step: f32,
}

impl Camera {
    /// Camera at `config.distance`, raised so it looks down on the ring at
    /// the angle given by `config.elevation`.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: config
                .elevation
                .atan2(config.distance)
                .clamp(MIN_PITCH, MAX_PITCH),
            distance: config
                .distance
                .clamp(config.min_distance, config.max_distance),
            target: Vec3::ZERO,
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: 16.0 / 9.0,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            zoom_step: config.zoom_step,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Clip-space size of one world unit at unit depth, for billboards.
    pub fn sprite_scale(&self) -> Vec2 {
        sprite_scale(&self.projection_matrix())
    }

    /// Match the surface aspect ratio. Zero-sized surfaces are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Rotate by a pointer drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Move one step closer.
    pub fn zoom_in(&mut self) {
        self.set_distance(self.distance - self.zoom_step);
    }

    /// Move one step away.
    pub fn zoom_out(&mut self) {
        self.set_distance(self.distance + self.zoom_step);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

/// Pixel-space projection with the origin at the top-left corner, y down.
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0)
}

/// Clip-space extent of one unit, taken from the projection's diagonal.
pub fn sprite_scale(projection: &Mat4) -> Vec2 {
    Vec2::new(projection.x_axis.x.abs(), projection.y_axis.y.abs())
}
