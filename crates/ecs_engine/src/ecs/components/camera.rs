//! Camera parameters
//!
//! Configuration only: no system writes a camera. The frame driver updates
//! the viewport on resize and rederives the projection.

use crate::ecs::Component;
use crate::foundation::math::{deg_to_rad, perspective, Mat4, Vec2};

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size as a float vector
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Width over height; 1.0 for a degenerate viewport
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Whether either dimension is zero (minimized window)
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Viewport in pixels
    pub viewport: Viewport,
}

impl Component for Camera {}

impl Camera {
    /// Create a camera whose aspect ratio follows `viewport`
    pub fn new(fov_degrees: f32, near: f32, far: f32, viewport: Viewport) -> Self {
        Self {
            fov: deg_to_rad(fov_degrees),
            aspect_ratio: viewport.aspect_ratio(),
            near,
            far,
            viewport,
        }
    }

    /// Projection matrix for the current parameters
    pub fn projection(&self) -> Mat4 {
        perspective(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Adopt a new viewport size and matching aspect ratio
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.aspect_ratio = viewport.aspect_ratio();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::new(35.0, 0.01, 100.0, Viewport::new(800, 600));
        assert_relative_eq!(camera.aspect_ratio, 4.0 / 3.0);

        camera.resize(Viewport::new(1000, 500));
        assert_relative_eq!(camera.aspect_ratio, 2.0);
        assert_relative_eq!(camera.projection()[(0, 0)] * 2.0, camera.projection()[(1, 1)], epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_viewport_keeps_finite_projection() {
        let camera = Camera::new(35.0, 0.01, 100.0, Viewport::new(0, 600));
        assert!(camera.projection().iter().all(|v| v.is_finite()));
    }
}
