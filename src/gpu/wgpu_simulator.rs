//! wgpu Simulator Backend
//!
//! Registered meshes become immutable storage buffers. The shape slot table
//! is mirrored into six fixed-capacity storage buffers that a compute
//! pipeline binds each step; `set_shapes` rewrites them from the host copy.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::shape_upload_data::GpuGeometry;
use super::shape_upload_operations::pack_shapes;
use crate::constants::gpu_limits;
use crate::error::{EngineError, EngineResult};
use crate::physics::{
    Aabb, HostBuffer, MeshHandle, Plane, ShapeKind, ShapeTableView, Simulator,
};

/// Device-side copy of a registered mesh
pub enum GpuMesh {
    /// Created but never updated
    Empty(ShapeKind),
    Convex {
        planes: wgpu::Buffer,
        plane_count: u32,
        bounds: Aabb,
    },
    Triangle {
        vertices: wgpu::Buffer,
        indices: wgpu::Buffer,
        vertex_count: u32,
        face_count: u32,
        bounds: Aabb,
    },
}

/// Device mirror of the shape slot table
pub struct GpuShapeBuffers {
    pub capacity: usize,
    pub flags: wgpu::Buffer,
    pub geometry: wgpu::Buffer,
    pub positions: wgpu::Buffer,
    pub rotations: wgpu::Buffer,
    pub prev_positions: wgpu::Buffer,
    pub prev_rotations: wgpu::Buffer,
}

pub struct WgpuSimulator {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    meshes: Vec<GpuMesh>,
    shapes: GpuShapeBuffers,
    /// Generation of the last uploaded table
    uploaded_generation: Option<u64>,
}

const SHAPE_USAGE: wgpu::BufferUsages =
    wgpu::BufferUsages::STORAGE.union(wgpu::BufferUsages::COPY_DST);

fn create_storage_buffer(
    device: &wgpu::Device,
    label: &'static str,
    element_size: usize,
    capacity: usize,
) -> EngineResult<wgpu::Buffer> {
    let size = (element_size as u64).saturating_mul(capacity as u64);
    if size == 0 || size > gpu_limits::MAX_BUFFER_BINDING_SIZE {
        return Err(EngineError::BufferCreationFailed {
            size,
            usage: format!("{:?} ({})", SHAPE_USAGE, label),
        });
    }

    Ok(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: SHAPE_USAGE,
        mapped_at_creation: false,
    }))
}

/// Allocate the device mirror for `capacity` rows
pub fn create_shape_buffers(device: &wgpu::Device, capacity: usize) -> EngineResult<GpuShapeBuffers> {
    let vec4 = std::mem::size_of::<[f32; 4]>();
    Ok(GpuShapeBuffers {
        capacity,
        flags: create_storage_buffer(device, "Shape Flags Buffer", std::mem::size_of::<u32>(), capacity)?,
        geometry: create_storage_buffer(
            device,
            "Shape Geometry Buffer",
            std::mem::size_of::<GpuGeometry>(),
            capacity,
        )?,
        positions: create_storage_buffer(device, "Shape Position Buffer", vec4, capacity)?,
        rotations: create_storage_buffer(device, "Shape Rotation Buffer", vec4, capacity)?,
        prev_positions: create_storage_buffer(device, "Shape Prev Position Buffer", vec4, capacity)?,
        prev_rotations: create_storage_buffer(device, "Shape Prev Rotation Buffer", vec4, capacity)?,
    })
}

impl WgpuSimulator {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        max_shapes: usize,
    ) -> EngineResult<Self> {
        let shapes = create_shape_buffers(&device, max_shapes)?;
        log::info!(
            "[WgpuSimulator::new] Shape buffers allocated for {} slots",
            max_shapes
        );

        Ok(Self {
            device,
            queue,
            meshes: Vec::new(),
            shapes,
            uploaded_generation: None,
        })
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn shape_buffers(&self) -> &GpuShapeBuffers {
        &self.shapes
    }

    fn create(&mut self, kind: ShapeKind) -> EngineResult<MeshHandle> {
        let handle = u32::try_from(self.meshes.len()).map_err(|_| {
            EngineError::ResourceExhausted("mesh handle space exhausted".to_string())
        })?;
        self.meshes.push(GpuMesh::Empty(kind));
        Ok(MeshHandle(handle))
    }

    fn slot_mut(&mut self, mesh: MeshHandle, kind: ShapeKind) -> EngineResult<&mut GpuMesh> {
        let slot = self
            .meshes
            .get_mut(mesh.0 as usize)
            .ok_or_else(|| EngineError::ResourceNotFound {
                resource_type: "mesh".to_string(),
                id: mesh.0.to_string(),
            })?;

        let stored_kind = match &*slot {
            GpuMesh::Empty(k) => *k,
            GpuMesh::Convex { .. } => ShapeKind::ConvexMesh,
            GpuMesh::Triangle { .. } => ShapeKind::TriangleMesh,
        };
        if stored_kind != kind {
            return Err(EngineError::StateError {
                expected: format!("{:?} mesh", kind),
                actual: format!("{:?} mesh", stored_kind),
            });
        }
        Ok(slot)
    }

    fn upload<T: bytemuck::Pod>(&self, label: &'static str, contents: &[T]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::STORAGE,
        })
    }
}

fn checked_prefix<T>(items: &[T], count: usize) -> EngineResult<&[T]> {
    items.get(..count).ok_or(EngineError::BufferAccess {
        index: count,
        size: items.len(),
    })
}

fn to_u32(value: usize, what: &str) -> EngineResult<u32> {
    u32::try_from(value).map_err(|_| EngineError::InvalidInput {
        field: what.to_string(),
        reason: format!("{} exceeds u32", value),
    })
}

impl Simulator for WgpuSimulator {
    fn create_convex_mesh(&mut self) -> EngineResult<MeshHandle> {
        self.create(ShapeKind::ConvexMesh)
    }

    fn update_convex_mesh(
        &mut self,
        mesh: MeshHandle,
        planes: &HostBuffer<Plane>,
        plane_count: usize,
        bounds: &Aabb,
    ) -> EngineResult<()> {
        let planes = checked_prefix(planes.contents()?, plane_count)?;
        let plane_count = to_u32(plane_count, "plane_count")?;
        self.slot_mut(mesh, ShapeKind::ConvexMesh)?;

        let buffer = self.upload("Convex Mesh Plane Buffer", planes);
        self.meshes[mesh.0 as usize] = GpuMesh::Convex {
            planes: buffer,
            plane_count,
            bounds: *bounds,
        };
        log::debug!(
            "[WgpuSimulator] Convex mesh {} uploaded ({} planes)",
            mesh.0,
            plane_count
        );
        Ok(())
    }

    fn create_triangle_mesh(&mut self) -> EngineResult<MeshHandle> {
        self.create(ShapeKind::TriangleMesh)
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
        let vertices = checked_prefix(vertices.contents()?, vertex_count)?;
        let indices = checked_prefix(indices.contents()?, face_count.saturating_mul(3))?;
        let vertex_count = to_u32(vertex_count, "vertex_count")?;
        let face_count = to_u32(face_count, "face_count")?;
        self.slot_mut(mesh, ShapeKind::TriangleMesh)?;

        let vertex_buffer = self.upload("Triangle Mesh Vertex Buffer", vertices);
        let index_buffer = self.upload("Triangle Mesh Index Buffer", indices);
        self.meshes[mesh.0 as usize] = GpuMesh::Triangle {
            vertices: vertex_buffer,
            indices: index_buffer,
            vertex_count,
            face_count,
            bounds: *bounds,
        };
        log::debug!(
            "[WgpuSimulator] Triangle mesh {} uploaded ({} vertices, {} faces)",
            mesh.0,
            vertex_count,
            face_count
        );
        Ok(())
    }

    fn set_shapes(&mut self, shapes: &ShapeTableView<'_>) -> EngineResult<()> {
        if self.uploaded_generation == Some(shapes.generation) {
            log::trace!("[WgpuSimulator] Shape table unchanged, skipping upload");
            return Ok(());
        }
        if shapes.len() > self.shapes.capacity {
            return Err(EngineError::ResourceExhausted(format!(
                "{} shapes exceed device capacity {}",
                shapes.len(),
                self.shapes.capacity
            )));
        }

        if !shapes.is_empty() {
            let packed = pack_shapes(shapes);
            let buffers = &self.shapes;
            self.queue
                .write_buffer(&buffers.flags, 0, bytemuck::cast_slice(&packed.flags));
            self.queue
                .write_buffer(&buffers.geometry, 0, bytemuck::cast_slice(&packed.geometry));
            self.queue
                .write_buffer(&buffers.positions, 0, bytemuck::cast_slice(&packed.positions));
            self.queue
                .write_buffer(&buffers.rotations, 0, bytemuck::cast_slice(&packed.rotations));
            self.queue.write_buffer(
                &buffers.prev_positions,
                0,
                bytemuck::cast_slice(&packed.prev_positions),
            );
            self.queue.write_buffer(
                &buffers.prev_rotations,
                0,
                bytemuck::cast_slice(&packed.prev_rotations),
            );
        }

        self.uploaded_generation = Some(shapes.generation);
        log::debug!("[WgpuSimulator] Uploaded {} shape rows", shapes.len());
        Ok(())
    }
}
