//! Draw submissions
//!
//! A [`DrawRequest`] is everything the backend needs to draw one entity with
//! the Phong shader: the world transform, its normal matrix, the projection
//! and the material/light colors. [`DrawRequest::uniforms`] packs the same
//! data into a `#[repr(C)]` block ready for a uniform buffer upload.

use super::resources::{MeshHandle, ShaderHandle};
use crate::ecs::Entity;
use crate::foundation::color::Color4;
use crate::foundation::math::{Mat3, Mat4, Vec3};

/// Light and surface colors for one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    /// Light position in world space
    pub light_position: Vec3,
    /// Light color
    pub light_color: Color4,
    /// Diffuse surface color
    pub diffuse: Color4,
    /// Ambient surface color
    pub ambient: Color4,
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    /// Entity being drawn
    pub entity: Entity,
    /// Compiled mesh
    pub mesh: MeshHandle,
    /// Shader program
    pub shader: ShaderHandle,
    /// Object-to-world transform
    pub transform: Mat4,
    /// Rotation/scale block of `transform`
    pub normal_matrix: Mat3,
    /// Projection (including the fixed view offset)
    pub projection: Mat4,
    /// Lighting parameters
    pub material: PhongMaterial,
}

/// Uniform block layout (std140-compatible: every row padded to 16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    /// Column-major object-to-world transform
    pub transformation: [[f32; 4]; 4],
    /// Column-major projection
    pub projection: [[f32; 4]; 4],
    /// Column-major normal matrix, columns padded to vec4
    pub normal_matrix: [[f32; 4]; 3],
    /// Light position (w = 1)
    pub light_position: [f32; 4],
    /// Light color
    pub light_color: [f32; 4],
    /// Diffuse color
    pub diffuse_color: [f32; 4],
    /// Ambient color
    pub ambient_color: [f32; 4],
}

impl DrawRequest {
    /// Pack into the uniform block layout
    pub fn uniforms(&self) -> DrawUniforms {
        let n = &self.normal_matrix;
        let column = |c: usize| [n[(0, c)], n[(1, c)], n[(2, c)], 0.0];
        let p = self.material.light_position;

        DrawUniforms {
            transformation: self.transform.into(),
            projection: self.projection.into(),
            normal_matrix: [column(0), column(1), column(2)],
            light_position: [p.x, p.y, p.z, 1.0],
            light_color: self.material.light_color.to_array(),
            diffuse_color: self.material.diffuse.to_array(),
            ambient_color: self.material.ambient.to_array(),
        }
    }
}

impl DrawUniforms {
    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DrawRequest {
        DrawRequest {
            entity: Entity::default(),
            mesh: MeshHandle(1),
            shader: ShaderHandle(2),
            transform: Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0)),
            normal_matrix: Mat3::from_diagonal(&Vec3::new(2.0, 3.0, 4.0)),
            projection: Mat4::identity(),
            material: PhongMaterial {
                light_position: Vec3::new(7.0, 7.0, 2.5),
                light_color: Color4::WHITE,
                diffuse: Color4::rgb(0.4, 0.2, 0.9),
                ambient: Color4::rgb(0.1, 0.0, 0.3),
            },
        }
    }

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), (16 + 16 + 12 + 4 * 4) * 4);
        assert_eq!(request().uniforms().as_bytes().len(), std::mem::size_of::<DrawUniforms>());
    }

    #[test]
    fn test_uniforms_are_column_major() {
        let u = request().uniforms();
        // translation lives in the fourth column
        assert_eq!(u.transformation[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.normal_matrix[1], [0.0, 3.0, 0.0, 0.0]);
        assert_eq!(u.light_position, [7.0, 7.0, 2.5, 1.0]);
        assert_eq!(u.diffuse_color, [0.4, 0.2, 0.9, 1.0]);
    }
}
