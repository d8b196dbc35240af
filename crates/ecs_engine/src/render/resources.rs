//! GPU resource handles and deferred release
//!
//! The backend owns the actual GPU objects; the core only holds opaque ids.
//! [`GpuMesh`] and [`GpuShader`] are shared, reference-counted wrappers:
//! when the last clone drops (for example when a `Drawable` is detached or
//! its entity destroyed) the id is pushed onto the backend's
//! [`ReleaseQueue`], and the backend frees it at the start of its next frame.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Opaque id of a compiled mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Opaque id of a shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u64);

/// Any backend-owned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    /// Compiled mesh
    Mesh(MeshHandle),
    /// Shader program
    Shader(ShaderHandle),
}

impl From<MeshHandle> for GpuResource {
    fn from(handle: MeshHandle) -> Self {
        Self::Mesh(handle)
    }
}

impl From<ShaderHandle> for GpuResource {
    fn from(handle: ShaderHandle) -> Self {
        Self::Shader(handle)
    }
}

/// Resources whose last owner has dropped, waiting for the backend
#[derive(Debug, Clone, Default)]
pub struct ReleaseQueue {
    pending: Arc<Mutex<Vec<GpuResource>>>,
}

impl ReleaseQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `resource` for release
    pub fn push(&self, resource: GpuResource) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resource);
    }

    /// Take every pending resource
    pub fn drain(&self) -> Vec<GpuResource> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of pending resources
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Tracked<H: Copy + Into<GpuResource>> {
    handle: H,
    queue: ReleaseQueue,
}

impl<H: Copy + Into<GpuResource>> Drop for Tracked<H> {
    fn drop(&mut self) {
        self.queue.push(self.handle.into());
    }
}

/// Shared owner of a backend resource id
pub struct GpuHandle<H: Copy + Into<GpuResource>> {
    inner: Arc<Tracked<H>>,
}

/// Shared owner of a compiled mesh
pub type GpuMesh = GpuHandle<MeshHandle>;

/// Shared owner of a shader program
pub type GpuShader = GpuHandle<ShaderHandle>;

impl<H: Copy + Into<GpuResource>> GpuHandle<H> {
    /// Take ownership of `handle`; it is released through `queue` when the
    /// last clone drops
    pub fn new(handle: H, queue: ReleaseQueue) -> Self {
        Self {
            inner: Arc::new(Tracked { handle, queue }),
        }
    }

    /// The raw id
    pub fn handle(&self) -> H {
        self.inner.handle
    }

    /// Number of live clones
    pub fn owners(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<H: Copy + Into<GpuResource>> Clone for GpuHandle<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Copy + Into<GpuResource> + PartialEq> PartialEq for GpuHandle<H> {
    fn eq(&self, other: &Self) -> bool {
        self.handle() == other.handle()
    }
}

impl<H: Copy + Into<GpuResource> + fmt::Debug> fmt::Debug for GpuHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GpuHandle").field(&self.handle()).finish()
    }
}
