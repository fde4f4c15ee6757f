//! Aim camera: the view that weapons take their aim rays from.

use crate::transform::{Ray, Transform};
use glam::{Vec2, Vec3};

/// Provides aim rays in screen space. Implemented by [`AimCamera`].
pub trait AimSource {
    /// Viewport size in pixels.
    fn viewport(&self) -> Vec2;

    /// Ray through a screen point (pixels, origin bottom-left, y up).
    fn screen_point_to_ray(&self, point: Vec2) -> Ray;

    /// Ray through the centre of the screen.
    fn forward_ray(&self) -> Ray {
        self.screen_point_to_ray(self.viewport() * 0.5)
    }

    /// Ray through `centre + offset * viewport`; offset is in viewport fractions.
    fn offset_ray(&self, offset: Vec2) -> Ray {
        let viewport = self.viewport();
        self.screen_point_to_ray(viewport * 0.5 + offset * viewport)
    }
}

/// Perspective camera with configurable FOV and viewport.
#[derive(Debug, Clone)]
pub struct AimCamera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl Default for AimCamera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 70.0,
            near: 0.1,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

impl AimCamera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Update viewport (call on window resize).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }
}

impl AimSource for AimCamera {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn screen_point_to_ray(&self, point: Vec2) -> Ray {
        let viewport = self.viewport.max(Vec2::ONE);
        let ndc = point / viewport * 2.0 - Vec2::ONE;
        let half_height = (self.fov_degrees.to_radians() * 0.5).tan();
        let local = Vec3::new(ndc.x * half_height * self.aspect(), ndc.y * half_height, -1.0);
        // Origin on the near plane, like a projected screen point.
        let origin = self.transform.transform_point(local * self.near);
        Ray::new(origin, self.transform.transform_direction(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_ray_matches_camera_forward() {
        let cam = AimCamera::new(Vec3::new(0.0, 2.0, 0.0));
        let ray = cam.forward_ray();
        assert!((ray.direction - cam.forward()).length() < 1e-5);
        assert!((ray.origin - Vec3::new(0.0, 2.0, -0.1)).length() < 1e-5);
    }

    #[test]
    fn positive_x_offset_aims_right() {
        let cam = AimCamera::default();
        let ray = cam.offset_ray(Vec2::new(0.2, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y.abs() < 1e-5);
        let left = cam.offset_ray(Vec2::new(-0.2, 0.0));
        assert!((left.direction.x + ray.direction.x).abs() < 1e-5);
    }
}
