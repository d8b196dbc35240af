//! Spatial components for the ECS system
//!
//! Translation, rotation and scale are separate components so a system can
//! borrow exactly the part it writes. The world transform is composed from
//! all three at render time (see [`compose_world_transform`]).

use crate::ecs::Component;
use crate::foundation::math::{axis_angle, compose_world_transform, deg_to_rad, Mat4, Quat, Vec3};

/// World-space translation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

impl Component for Position {}

/// World-space rotation. Kept unit-length by every system that writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation(pub Quat);

impl Component for Orientation {}

impl Default for Orientation {
    fn default() -> Self {
        Self(Quat::identity())
    }
}

impl Orientation {
    /// Quaternion norm; ~1 for a valid orientation
    pub fn norm(&self) -> f32 {
        self.0.quaternion().norm()
    }

    /// Replace with `rotation`, renormalized
    pub fn set_renormalized(&mut self, rotation: Quat) {
        self.0 = Quat::new_normalize(rotation.into_inner());
    }
}

/// Non-uniform scale factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub Vec3);

impl Component for Scale {}

impl Default for Scale {
    fn default() -> Self {
        Self(Vec3::new(1.0, 1.0, 1.0))
    }
}

impl Scale {
    /// Same factor on every axis
    pub fn uniform(factor: f32) -> Self {
        Self(Vec3::new(factor, factor, factor))
    }
}

/// Factory for common spatial component bundles
pub struct TransformFactory;

impl TransformFactory {
    /// Origin, no rotation, unit scale
    pub fn identity() -> (Position, Orientation, Scale) {
        (Position::default(), Orientation::default(), Scale::default())
    }

    /// Position with a rotation of `degrees` about `axis`
    pub fn from_axis_angle(position: Vec3, axis: Vec3, degrees: f32, scale: Vec3) -> (Position, Orientation, Scale) {
        let rotation = nalgebra::Unit::try_new(axis, f32::EPSILON)
            .map_or_else(Quat::identity, |axis| axis_angle(&axis, deg_to_rad(degrees)));
        (Position(position), Orientation(rotation), Scale(scale))
    }

    /// World matrix for a spatial bundle
    pub fn to_matrix(position: &Position, orientation: &Orientation, scale: &Scale) -> Mat4 {
        compose_world_transform(&position.0, &orientation.0, &scale.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_angle_bundle() {
        let (position, orientation, scale) =
            TransformFactory::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), Vec3::y(), 30.0, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(position.0, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(orientation.0.angle(), deg_to_rad(30.0), epsilon = 1e-6);
        assert_relative_eq!(orientation.norm(), 1.0, epsilon = 1e-6);
        assert_eq!(scale, Scale::default());
    }

    #[test]
    fn test_zero_axis_falls_back_to_identity() {
        let (_, orientation, _) =
            TransformFactory::from_axis_angle(Vec3::zeros(), Vec3::zeros(), 45.0, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(orientation, Orientation::default());
    }

    #[test]
    fn test_bundle_matrix_scales_local_point() {
        let m = TransformFactory::to_matrix(&Position::default(), &Orientation::default(), &Scale::uniform(2.0));
        assert_relative_eq!(m.transform_point(&Point3::new(1.0, 0.0, 0.0)), Point3::new(2.0, 0.0, 0.0));
    }
}
