//! Release-color system: each click release steps the hue of every drawable

use crate::ecs::components::Drawable;
use crate::ecs::World;
use crate::foundation::color::Color4;
use crate::foundation::math::gcd;

/// Hue step applied per release, in degrees
pub const DEFAULT_HUE_STEP_DEGREES: f32 = 50.0;

/// Rotate the hue of every [`Drawable`] by `step_degrees`, with saturation
/// and value forced to 1. Alpha is kept. Returns the number of drawables
/// recolored.
pub fn release_color_system(world: &mut World, step_degrees: f32) -> usize {
    let mut recolored = 0;
    for (_, drawable) in world.view_mut::<Drawable>() {
        let alpha = drawable.color.a;
        drawable.color = Color4::from_hsv(drawable.color.hue() + step_degrees, 1.0, 1.0).with_alpha(alpha);
        recolored += 1;
    }
    recolored
}

/// Number of whole-degree steps after which the hue is back where it started
pub const fn hue_cycle_period(step_degrees: u32) -> u32 {
    let range = 360;
    let step = step_degrees % range;
    if step == 0 {
        1
    } else {
        range / gcd(step, range)
    }
}
