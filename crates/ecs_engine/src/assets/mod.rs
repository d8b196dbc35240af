//! Asset management
//!
//! Named meshes and shaders are loaded through [`ResourceManager`]s whose
//! loaders compile built-in primitives on the graphics backend. The render
//! path only consumes `Final` handles.

pub mod resource_manager;

pub use resource_manager::{
    DataState, LoadOutcome, ResourceError, ResourceKey, ResourceLoader, ResourceManager, ResourceState,
};

use crate::render::{GpuMesh, GpuShader, GraphicsBackend, MeshPrimitive, ShaderKind};

/// Compiles built-in mesh primitives by name (`cube`, `plane`, `sphere`)
#[derive(Debug, Default)]
pub struct PrimitiveMeshLoader;

impl ResourceLoader<GpuMesh, dyn GraphicsBackend> for PrimitiveMeshLoader {
    fn load(
        &mut self,
        name: &str,
        backend: &mut (dyn GraphicsBackend + 'static),
    ) -> Result<LoadOutcome<GpuMesh>, ResourceError> {
        let Some(primitive) = MeshPrimitive::from_name(name) else {
            return Ok(LoadOutcome::NotFound);
        };
        let mesh = backend.compile_mesh(primitive).map_err(|e| ResourceError::LoaderFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(LoadOutcome::Loaded(mesh, DataState::Final))
    }
}

/// Builds built-in shader programs by name (`phong`, `flat`)
#[derive(Debug, Default)]
pub struct BuiltinShaderLoader;

impl ResourceLoader<GpuShader, dyn GraphicsBackend> for BuiltinShaderLoader {
    fn load(
        &mut self,
        name: &str,
        backend: &mut (dyn GraphicsBackend + 'static),
    ) -> Result<LoadOutcome<GpuShader>, ResourceError> {
        let Some(kind) = ShaderKind::from_name(name) else {
            return Ok(LoadOutcome::NotFound);
        };
        let shader = backend.create_shader(kind).map_err(|e| ResourceError::LoaderFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(LoadOutcome::Loaded(shader, DataState::Final))
    }
}

/// Mesh and shader managers with the built-in loaders installed
pub struct GpuResources {
    /// Compiled meshes by name
    pub meshes: ResourceManager<GpuMesh, dyn GraphicsBackend>,
    /// Shader programs by name
    pub shaders: ResourceManager<GpuShader, dyn GraphicsBackend>,
}

impl Default for GpuResources {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuResources {
    /// Create managers with the built-in loaders
    pub fn new() -> Self {
        Self {
            meshes: ResourceManager::with_loader(PrimitiveMeshLoader),
            shaders: ResourceManager::with_loader(BuiltinShaderLoader),
        }
    }

    /// Resolve a mesh/shader pair, loading either on first use
    pub fn resolve(
        &mut self,
        mesh: &str,
        shader: &str,
        backend: &mut (dyn GraphicsBackend + 'static),
    ) -> Result<(GpuMesh, GpuShader), ResourceError> {
        let mesh = self.meshes.load_resolved(mesh, backend)?.clone();
        let shader = self.shaders.load_resolved(shader, backend)?.clone();
        Ok((mesh, shader))
    }
}
