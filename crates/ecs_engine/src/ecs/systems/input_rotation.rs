//! Input-rotation system: pointer drag rotates every oriented entity

use crate::ecs::components::Orientation;
use crate::ecs::World;
use crate::foundation::math::{axis_angle, world_right, world_up, Vec2};

/// Rotate every [`Orientation`] by a drag delta in normalized screen units.
///
/// The horizontal component yaws about the world up axis (left-multiplied,
/// so the orbit does not depend on the current pitch); the vertical
/// component pitches about the right axis in the object's local frame
/// (right-multiplied). The result is renormalized. Returns the number of
/// entities rotated.
pub fn input_rotation_system(world: &mut World, delta: Vec2) -> usize {
    let yaw = axis_angle(&world_up(), delta.x);
    let pitch = axis_angle(&world_right(), delta.y);

    let mut rotated = 0;
    for (_, orientation) in world.view_mut::<Orientation>() {
        orientation.set_renormalized(yaw * orientation.0 * pitch);
        rotated += 1;
    }
    rotated
}
