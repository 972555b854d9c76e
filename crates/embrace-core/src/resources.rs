//! GPU seam: the `RenderBackend` trait plus the per-session registry of every
//! backend resource the session created.

use crate::camera::Viewport;
use crate::error::SceneError;
use crate::lighting::LightRig;
use crate::mesh::MeshData;
use glam::{Mat4, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    ParticleBuffer,
}

/// Flat-colored lit surface description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub opacity: f32,
}

impl Material {
    pub fn solid(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            opacity: 1.0,
        }
    }

    pub fn glowing(color: [f32; 3], glow: f32) -> Self {
        Self {
            color,
            emissive: color.map(|c| c * glow),
            opacity: 1.0,
        }
    }
}

/// One mesh draw for this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub model: Mat4,
}

pub type DrawList = SmallVec<[DrawItem; 16]>;

/// Borrowed view of the particle buffers, uploaded as-is.
#[derive(Clone, Copy, Debug)]
pub struct ParticleView<'a> {
    pub buffer: ResourceId,
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
}

/// Everything the backend needs to draw one frame.
pub struct RenderFrame<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub time: f32,
    pub clear_color: [f32; 3],
    pub draws: &'a [DrawItem],
    pub particles: ParticleView<'a>,
    pub lights: &'a LightRig,
}

/// Rendering surface abstraction. The web front end implements it with wgpu;
/// tests implement it with a counting mock.
pub trait RenderBackend {
    fn create_geometry(&mut self, label: &str, mesh: &MeshData) -> Result<ResourceId, SceneError>;
    fn create_material(&mut self, label: &str, material: &Material)
        -> Result<ResourceId, SceneError>;
    fn create_particle_buffer(
        &mut self,
        label: &str,
        capacity: usize,
    ) -> Result<ResourceId, SceneError>;
    /// Free a resource. Must tolerate ids it no longer knows.
    fn release(&mut self, id: ResourceId);
    fn resize(&mut self, viewport: Viewport);
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SceneError>;
    /// Remove the output surface from the host page.
    fn detach(&mut self);
}

/// Ownership list of every backend resource a session created, in creation
/// order. Teardown walks this list instead of the scene.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: Vec<(ResourceId, ResourceKind)>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        label: &str,
        mesh: &MeshData,
    ) -> Result<ResourceId, SceneError> {
        let id = backend.create_geometry(label, mesh)?;
        self.entries.push((id, ResourceKind::Geometry));
        Ok(id)
    }

    pub fn material<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        label: &str,
        material: &Material,
    ) -> Result<ResourceId, SceneError> {
        let id = backend.create_material(label, material)?;
        self.entries.push((id, ResourceKind::Material));
        Ok(id)
    }

    pub fn particle_buffer<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        label: &str,
        capacity: usize,
    ) -> Result<ResourceId, SceneError> {
        let id = backend.create_particle_buffer(label, capacity)?;
        self.entries.push((id, ResourceKind::ParticleBuffer));
        Ok(id)
    }

    /// Release everything in reverse creation order and empty the registry.
    /// Calling it again is a no-op.
    pub fn release_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let count = self.entries.len();
        for (id, kind) in self.entries.drain(..).rev() {
            log::debug!("[resources] release {:?} {:?}", kind, id);
            backend.release(id);
        }
        count
    }

    pub fn live(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.entries.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.iter().any(|(e, _)| *e == id)
    }
}
