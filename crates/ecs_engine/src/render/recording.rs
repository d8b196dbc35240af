//! In-memory backend that records frames instead of drawing them.
//!
//! Used by the headless demo and by tests to observe exactly what the
//! render pass submitted.

use super::backend::{ClearTargets, GraphicsBackend, MeshPrimitive, RenderError, ShaderKind};
use super::draw::DrawRequest;
use super::resources::{GpuMesh, GpuResource, GpuShader, MeshHandle, ReleaseQueue, ShaderHandle};
use std::collections::HashMap;

/// One presented frame
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Targets cleared at frame start
    pub cleared: ClearTargets,
    /// Draws in submission order
    pub draws: Vec<DrawRequest>,
}

/// Backend that keeps every presented frame in memory
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    meshes: HashMap<MeshHandle, MeshPrimitive>,
    shaders: HashMap<ShaderHandle, ShaderKind>,
    current: Option<RecordedFrame>,
    frames: Vec<RecordedFrame>,
    released: Vec<GpuResource>,
    release_queue: ReleaseQueue,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Presented frames, oldest first
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Most recently presented frame
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Resources freed so far
    pub fn released(&self) -> &[GpuResource] {
        &self.released
    }

    /// Number of meshes still alive on the backend
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Number of shaders still alive on the backend
    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    /// Primitive behind a mesh handle
    pub fn mesh_primitive(&self, handle: MeshHandle) -> Option<MeshPrimitive> {
        self.meshes.get(&handle).copied()
    }

    /// Total draws across all presented frames
    pub fn total_draws(&self) -> usize {
        self.frames.iter().map(|frame| frame.draws.len()).sum()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsBackend for RecordingBackend {
    fn compile_mesh(&mut self, primitive: MeshPrimitive) -> Result<GpuMesh, RenderError> {
        let handle = MeshHandle(self.allocate_id());
        let (vertices, indices) = primitive.counts();
        log::debug!("Compiled {primitive:?} as {handle:?} ({vertices} vertices, {indices} indices)");
        self.meshes.insert(handle, primitive);
        Ok(GpuMesh::new(handle, self.release_queue.clone()))
    }

    fn create_shader(&mut self, kind: ShaderKind) -> Result<GpuShader, RenderError> {
        let handle = ShaderHandle(self.allocate_id());
        log::debug!("Created {kind:?} shader as {handle:?}");
        self.shaders.insert(handle, kind);
        Ok(GpuShader::new(handle, self.release_queue.clone()))
    }

    fn begin_frame(&mut self, targets: ClearTargets) -> Result<(), RenderError> {
        if self.current.is_some() {
            return Err(RenderError::FrameInProgress);
        }
        self.collect_released();
        self.current = Some(RecordedFrame {
            cleared: targets,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn submit(&mut self, request: &DrawRequest) -> Result<(), RenderError> {
        if !self.meshes.contains_key(&request.mesh) {
            return Err(RenderError::UnknownMesh(request.mesh.0));
        }
        if !self.shaders.contains_key(&request.shader) {
            return Err(RenderError::UnknownShader(request.shader.0));
        }
        let frame = self.current.as_mut().ok_or(RenderError::FrameNotStarted)?;
        frame.draws.push(request.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let frame = self.current.take().ok_or(RenderError::FrameNotStarted)?;
        log::trace!("Presented frame {} with {} draws", self.frames.len(), frame.draws.len());
        self.frames.push(frame);
        Ok(())
    }

    fn release(&mut self, resource: GpuResource) {
        match resource {
            GpuResource::Mesh(handle) => {
                self.meshes.remove(&handle);
            }
            GpuResource::Shader(handle) => {
                self.shaders.remove(&handle);
            }
        }
        log::debug!("Released {resource:?}");
        self.released.push(resource);
    }

    fn release_queue(&self) -> &ReleaseQueue {
        &self.release_queue
    }
}
