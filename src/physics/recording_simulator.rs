//! Recording Simulator - in-memory backend
//!
//! Keeps a copy of every registered mesh and every published shape table.
//! Used by tests and demos in place of a device-backed simulator.

use bytemuck::Pod;

use super::aabb::Aabb;
use super::host_buffer::HostBuffer;
use super::shape_data::{GeometryDescriptor, MeshHandle, Plane, ShapeFlags, ShapeKind};
use super::shape_table_data::ShapeTableView;
use super::simulator::Simulator;
use crate::error::{EngineError, EngineResult};
use glam::{Quat, Vec4};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedConvexMesh {
    pub planes: Vec<Plane>,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTriangleMesh {
    pub vertices: Vec<[f32; 4]>,
    pub indices: Vec<i32>,
    pub face_count: usize,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedMesh {
    /// Created but never updated
    Empty(ShapeKind),
    Convex(RecordedConvexMesh),
    Triangle(RecordedTriangleMesh),
}

/// Snapshot of one `set_shapes` call
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedShapes {
    pub flags: Vec<ShapeFlags>,
    pub geometry: Vec<GeometryDescriptor>,
    pub positions: Vec<Vec4>,
    pub rotations: Vec<Quat>,
    pub prev_positions: Vec<Vec4>,
    pub prev_rotations: Vec<Quat>,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct RecordingSimulator {
    pub meshes: Vec<RecordedMesh>,
    pub published: Vec<PublishedShapes>,
    pub host_allocations: usize,
    /// Fail every mesh update, for exercising error paths
    pub reject_updates: bool,
}

impl RecordingSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&RecordedMesh> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn convex_mesh(&self, handle: MeshHandle) -> Option<&RecordedConvexMesh> {
        match self.mesh(handle)? {
            RecordedMesh::Convex(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn triangle_mesh(&self, handle: MeshHandle) -> Option<&RecordedTriangleMesh> {
        match self.mesh(handle)? {
            RecordedMesh::Triangle(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn last_published(&self) -> Option<&PublishedShapes> {
        self.published.last()
    }

    fn create(&mut self, kind: ShapeKind) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(RecordedMesh::Empty(kind));
        handle
    }

    fn slot_for(&mut self, mesh: MeshHandle, kind: ShapeKind) -> EngineResult<&mut RecordedMesh> {
        if self.reject_updates {
            return Err(EngineError::GpuOperationFailed {
                operation: format!("update {:?} {}", kind, mesh.0),
                error: "updates rejected".to_string(),
            });
        }

        let slot = self
            .meshes
            .get_mut(mesh.0 as usize)
            .ok_or_else(|| EngineError::ResourceNotFound {
                resource_type: "mesh".to_string(),
                id: mesh.0.to_string(),
            })?;

        let stored_kind = match &*slot {
            RecordedMesh::Empty(k) => *k,
            RecordedMesh::Convex(_) => ShapeKind::ConvexMesh,
            RecordedMesh::Triangle(_) => ShapeKind::TriangleMesh,
        };
        if stored_kind != kind {
            return Err(EngineError::StateError {
                expected: format!("{:?} mesh", kind),
                actual: format!("{:?} mesh", stored_kind),
            });
        }
        Ok(slot)
    }
}

fn check_count(count: usize, len: usize) -> EngineResult<()> {
    if count > len {
        return Err(EngineError::BufferAccess {
            index: count,
            size: len,
        });
    }
    Ok(())
}

impl Simulator for RecordingSimulator {
    fn alloc_host_buffer<T: Pod>(
        &mut self,
        label: &'static str,
        len: usize,
    ) -> EngineResult<HostBuffer<T>> {
        self.host_allocations += 1;
        Ok(HostBuffer::zeroed(label, len))
    }

    fn create_convex_mesh(&mut self) -> EngineResult<MeshHandle> {
        Ok(self.create(ShapeKind::ConvexMesh))
    }

    fn update_convex_mesh(
        &mut self,
        mesh: MeshHandle,
        planes: &HostBuffer<Plane>,
        plane_count: usize,
        bounds: &Aabb,
    ) -> EngineResult<()> {
        let planes = planes.contents()?;
        check_count(plane_count, planes.len())?;

        let slot = self.slot_for(mesh, ShapeKind::ConvexMesh)?;
        *slot = RecordedMesh::Convex(RecordedConvexMesh {
            planes: planes[..plane_count].to_vec(),
            bounds: *bounds,
        });
        Ok(())
    }

    fn create_triangle_mesh(&mut self) -> EngineResult<MeshHandle> {
        Ok(self.create(ShapeKind::TriangleMesh))
    }

    fn update_triangle_mesh(
        &mut self,
        mesh: MeshHandle,
        vertices: &HostBuffer<[f32; 4]>,
        indices: &HostBuffer<i32>,
        vertex_count: usize,
        face_count: usize,
        bounds: &Aabb,
    ) -> EngineResult<()> {
        let vertices = vertices.contents()?;
        let indices = indices.contents()?;
        check_count(vertex_count, vertices.len())?;
        check_count(face_count * 3, indices.len())?;

        let slot = self.slot_for(mesh, ShapeKind::TriangleMesh)?;
        *slot = RecordedMesh::Triangle(RecordedTriangleMesh {
            vertices: vertices[..vertex_count].to_vec(),
            indices: indices[..face_count * 3].to_vec(),
            face_count,
            bounds: *bounds,
        });
        Ok(())
    }

    fn set_shapes(&mut self, shapes: &ShapeTableView<'_>) -> EngineResult<()> {
        self.published.push(PublishedShapes {
            flags: shapes.flags.to_vec(),
            geometry: shapes.geometry.to_vec(),
            positions: shapes.positions.to_vec(),
            rotations: shapes.rotations.to_vec(),
            prev_positions: shapes.prev_positions.to_vec(),
            prev_rotations: shapes.prev_rotations.to_vec(),
            generation: shapes.generation,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_bounds() -> Aabb {
        Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        }
    }

    #[test]
    fn test_handles_are_sequential() {
        let mut sim = RecordingSimulator::new();
        assert_eq!(sim.create_convex_mesh().expect("create"), MeshHandle(0));
        assert_eq!(sim.create_triangle_mesh().expect("create"), MeshHandle(1));
        assert_eq!(sim.mesh(MeshHandle(1)), Some(&RecordedMesh::Empty(ShapeKind::TriangleMesh)));
    }

    #[test]
    fn test_update_kind_mismatch() {
        let mut sim = RecordingSimulator::new();
        let mesh = sim.create_triangle_mesh().expect("create");
        let planes: HostBuffer<Plane> = sim.alloc_host_buffer("planes", 1).expect("alloc");
        let err = sim
            .update_convex_mesh(mesh, &planes, 1, &unit_bounds())
            .expect_err("triangle mesh cannot take planes");
        assert!(matches!(err, EngineError::StateError { .. }));
    }

    #[test]
    fn test_update_rejects_mapped_buffer() {
        let mut sim = RecordingSimulator::new();
        let mesh = sim.create_convex_mesh().expect("create");
        let mut planes: HostBuffer<Plane> = sim.alloc_host_buffer("planes", 1).expect("alloc");
        std::mem::forget(planes.map());
        assert!(matches!(
            sim.update_convex_mesh(mesh, &planes, 1, &unit_bounds()),
            Err(EngineError::BufferError { .. })
        ));
    }

    #[test]
    fn test_update_rejects_short_buffer() {
        let mut sim = RecordingSimulator::new();
        let mesh = sim.create_convex_mesh().expect("create");
        let planes: HostBuffer<Plane> = sim.alloc_host_buffer("planes", 1).expect("alloc");
        assert!(matches!(
            sim.update_convex_mesh(mesh, &planes, 2, &unit_bounds()),
            Err(EngineError::BufferAccess { index: 2, size: 1 })
        ));
        assert_eq!(sim.host_allocations, 1);
    }
}
