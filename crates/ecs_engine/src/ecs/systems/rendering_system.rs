//! # Rendering System
//!
//! Read-only pass over every renderable entity. For each one it composes the
//! world transform (scale, then rotation about the origin, then
//! translation), takes the rotation/scale block as the normal matrix, derives
//! Phong colors from the entity color and submits a [`DrawRequest`].
//!
//! Lighting is fixed per call: one point light, diffuse equal to the entity
//! color and ambient equal to the same hue at a reduced value.

use crate::debug_print;
use crate::ecs::components::{Drawable, Orientation, Position, Renderable, Scale};
use crate::ecs::{Entity, World};
use crate::foundation::color::Color4;
use crate::foundation::math::{compose_world_transform, rotation_scaling, Mat4, Vec3};
use crate::render::{DrawRequest, GraphicsBackend, PhongMaterial, RenderError};

/// Fixed light used by the render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParameters {
    /// World-space light position
    pub light_position: Vec3,
    /// Light color
    pub light_color: Color4,
    /// HSV value of the ambient color
    pub ambient_value: f32,
}

impl Default for LightingParameters {
    fn default() -> Self {
        Self {
            light_position: Vec3::new(7.0, 7.0, 2.5),
            light_color: Color4::WHITE,
            ambient_value: 0.3,
        }
    }
}

impl LightingParameters {
    /// Phong colors for a surface of the given color
    pub fn material_for(&self, color: Color4) -> PhongMaterial {
        PhongMaterial {
            light_position: self.light_position,
            light_color: self.light_color,
            diffuse: color,
            ambient: Color4::from_hsv(color.hue(), 1.0, self.ambient_value),
        }
    }
}

/// Build the draw request for one entity
pub fn build_draw_request(
    entity: Entity,
    position: &Position,
    orientation: &Orientation,
    scale: &Scale,
    drawable: &Drawable,
    projection: &Mat4,
    lighting: &LightingParameters,
) -> DrawRequest {
    let transform = compose_world_transform(&position.0, &orientation.0, &scale.0);

    DrawRequest {
        entity,
        mesh: drawable.mesh.handle(),
        shader: drawable.shader.handle(),
        transform,
        normal_matrix: rotation_scaling(&transform),
        projection: *projection,
        material: lighting.material_for(drawable.color),
    }
}

/// Submit one draw per renderable entity. Returns the number of draws.
pub fn render_system<B: GraphicsBackend + ?Sized>(
    world: &World,
    backend: &mut B,
    projection: &Mat4,
    lighting: &LightingParameters,
) -> Result<usize, RenderError> {
    debug_print!("Rendering..");

    let mut submitted = 0;
    for (entity, (identity, position, orientation, scale, drawable)) in world.view::<Renderable>() {
        let request = build_draw_request(entity, position, orientation, scale, drawable, projection, lighting);
        log::trace!("Submitting draw for '{identity}' ({entity:?})");
        backend.submit(&request)?;
        submitted += 1;
    }
    Ok(submitted)
}
