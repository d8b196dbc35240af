//! Graphics backend contract
//!
//! The core never touches GPU state. It asks a [`GraphicsBackend`] for
//! opaque mesh/shader handles, then per frame issues clear, draw and present
//! requests. Implementations decide how (or whether) anything reaches a GPU.

use super::draw::DrawRequest;
use super::resources::{GpuMesh, GpuResource, GpuShader, ReleaseQueue};
use thiserror::Error;

bitflags::bitflags! {
    /// Framebuffer attachments cleared at frame start
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearTargets: u8 {
        /// Color attachment
        const COLOR = 1 << 0;
        /// Depth attachment
        const DEPTH = 1 << 1;
    }
}

/// Built-in mesh primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshPrimitive {
    /// Unit cube centered at the origin (24 vertices, flat normals)
    Cube,
    /// Unit plane in XY
    Plane,
    /// UV sphere of radius 1
    Sphere,
}

impl MeshPrimitive {
    /// Look up a primitive by resource name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cube" => Some(Self::Cube),
            "plane" => Some(Self::Plane),
            "sphere" => Some(Self::Sphere),
            _ => None,
        }
    }

    /// Vertex and index count of the generated geometry
    pub const fn counts(self) -> (usize, usize) {
        match self {
            Self::Cube => (24, 36),
            Self::Plane => (4, 6),
            // 16 rings x 32 segments
            Self::Sphere => (17 * 33, 16 * 32 * 6),
        }
    }
}

/// Built-in shader programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Per-fragment Phong with one point light
    Phong,
    /// Unlit, diffuse color only
    Flat,
}

impl ShaderKind {
    /// Look up a shader by resource name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "phong" => Some(Self::Phong),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }
}

/// Backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Draw referenced a mesh the backend does not know
    #[error("Unknown mesh handle: {0}")]
    UnknownMesh(u64),

    /// Draw referenced a shader the backend does not know
    #[error("Unknown shader handle: {0}")]
    UnknownShader(u64),

    /// Submit or present outside `begin_frame`/`end_frame`
    #[error("No frame in progress")]
    FrameNotStarted,

    /// `begin_frame` while a frame is already open
    #[error("Frame already in progress")]
    FrameInProgress,

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// External graphics collaborator
pub trait GraphicsBackend {
    /// Compile a built-in mesh
    fn compile_mesh(&mut self, primitive: MeshPrimitive) -> Result<GpuMesh, RenderError>;

    /// Build a shader program
    fn create_shader(&mut self, kind: ShaderKind) -> Result<GpuShader, RenderError>;

    /// Start a frame, clearing `targets`
    fn begin_frame(&mut self, targets: ClearTargets) -> Result<(), RenderError>;

    /// Queue one draw in the current frame
    fn submit(&mut self, request: &DrawRequest) -> Result<(), RenderError>;

    /// Finish and present the current frame
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Free a resource whose last owner dropped
    fn release(&mut self, resource: GpuResource);

    /// Queue shared with every handle this backend hands out
    fn release_queue(&self) -> &ReleaseQueue;

    /// Free everything pending in the release queue; returns how many
    fn collect_released(&mut self) -> usize {
        let pending = self.release_queue().drain();
        let count = pending.len();
        for resource in pending {
            self.release(resource);
        }
        count
    }
}
