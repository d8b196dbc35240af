//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of transform helpers the
//! systems share. All matrices are column-major and act on column vectors,
//! so `A * B` applies `B` first.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, UnitQuaternion, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// World-space up axis (+Y)
pub fn world_up() -> Unit<Vec3> {
    Vec3::y_axis()
}

/// World-space right axis (+X)
pub fn world_right() -> Unit<Vec3> {
    Vec3::x_axis()
}

/// Compose a world transform from its parts.
///
/// Scale is applied first, then rotation about the origin, then
/// translation: `T * R * S` for column vectors.
pub fn compose_world_transform(position: &Vec3, orientation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * orientation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Upper-left 3x3 block of an affine transform (rotation and scale, no translation)
pub fn rotation_scaling(transform: &Mat4) -> Mat3 {
    transform.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Right-handed perspective projection with OpenGL clip-space depth ([-1, 1])
pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    nalgebra::Perspective3::new(aspect_ratio, fov_y, near, far).to_homogeneous()
}

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Convert radians to degrees
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Greatest common divisor
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Quaternion rotating by `angle` radians about `axis`
pub fn axis_angle(axis: &Unit<Vec3>, angle: f32) -> Quat {
    UnitQuaternion::from_axis_angle(axis, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_scale_applies_before_translation() {
        let m = compose_world_transform(&Vec3::zeros(), &Quat::identity(), &Vec3::new(2.0, 2.0, 2.0));
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_non_uniform_scale_then_rotate_then_translate() {
        let rotation = axis_angle(&world_up(), deg_to_rad(90.0));
        let m = compose_world_transform(&Vec3::new(0.0, 0.0, 5.0), &rotation, &Vec3::new(3.0, 1.0, 1.0));
        // (1,0,0) -> scale (3,0,0) -> yaw 90deg (0,0,-3) -> translate (0,0,2)
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_scaling_drops_translation() {
        let m = compose_world_transform(&Vec3::new(4.0, 5.0, 6.0), &Quat::identity(), &Vec3::new(2.0, 3.0, 4.0));
        let n = rotation_scaling(&m);
        assert_relative_eq!(n, Mat3::from_diagonal(&Vec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_perspective_maps_near_plane_to_minus_one() {
        let p = perspective(deg_to_rad(35.0), 4.0 / 3.0, 0.01, 100.0);
        let clip = p * Vec4::new(0.0, 0.0, -0.01, 1.0);
        assert_relative_eq!(clip.z / clip.w, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(50, 360), 10);
        assert_eq!(gcd(360, 0), 360);
        assert_eq!(gcd(7, 13), 1);
    }
}
