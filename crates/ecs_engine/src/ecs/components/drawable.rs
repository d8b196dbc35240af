//! Drawable component
//!
//! Bundles the mesh and shader an entity is drawn with, plus its color.
//! The handles are shared owners: dropping the component (detach, replace
//! or entity destruction) gives the backend its resources back once no
//! other owner remains.

use crate::ecs::Component;
use crate::foundation::color::Color4;
use crate::render::{GpuMesh, GpuShader};

/// GPU geometry, shading program and color of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Compiled geometry
    pub mesh: GpuMesh,
    /// Shader program
    pub shader: GpuShader,
    /// Surface color, channels in `[0, 1]`
    pub color: Color4,
}

impl Component for Drawable {}

impl Drawable {
    /// Create a drawable
    pub const fn new(mesh: GpuMesh, shader: GpuShader, color: Color4) -> Self {
        Self { mesh, shader, color }
    }
}

/// Factory for drawables sharing one mesh/shader pair
pub struct DrawableFactory {
    mesh: GpuMesh,
    shader: GpuShader,
}

impl DrawableFactory {
    /// Create a factory over resolved handles
    pub const fn new(mesh: GpuMesh, shader: GpuShader) -> Self {
        Self { mesh, shader }
    }

    /// Drawable with the given color
    pub fn with_color(&self, color: Color4) -> Drawable {
        Drawable::new(self.mesh.clone(), self.shader.clone(), color)
    }

    /// Fully saturated, full-value drawable of the given hue (degrees)
    pub fn with_hue(&self, hue: f32) -> Drawable {
        self.with_color(Color4::from_hsv(hue, 1.0, 1.0))
    }
}
