//! Rendering collaborator contracts
//!
//! The ECS core only talks to a [`GraphicsBackend`]: it holds opaque mesh and
//! shader handles and hands over [`DrawRequest`]s. [`RecordingBackend`] is an
//! in-memory implementation for headless runs and tests.

pub mod backend;
pub mod draw;
pub mod resources;
pub mod recording;

pub use backend::{ClearTargets, GraphicsBackend, MeshPrimitive, RenderError, ShaderKind};
pub use draw::{DrawRequest, DrawUniforms, PhongMaterial};
pub use resources::{GpuHandle, GpuMesh, GpuResource, GpuShader, MeshHandle, ReleaseQueue, ShaderHandle};
pub use recording::{RecordedFrame, RecordingBackend};
