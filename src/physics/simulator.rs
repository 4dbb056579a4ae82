//! Simulator seam
//!
//! Everything the core asks of the physics backend. Implementations:
//! - `RecordingSimulator`: in-memory, records every call
//! - `gpu::WgpuSimulator`: uploads into wgpu storage buffers

use bytemuck::Pod;

use super::aabb::Aabb;
use super::host_buffer::HostBuffer;
use super::shape_data::{MeshHandle, Plane};
use super::shape_table_data::ShapeTableView;
use crate::error::EngineResult;

pub trait Simulator {
    /// Allocate simulator-owned host memory for `len` elements
    fn alloc_host_buffer<T: Pod>(
        &mut self,
        label: &'static str,
        len: usize,
    ) -> EngineResult<HostBuffer<T>> {
        Ok(HostBuffer::zeroed(label, len))
    }

    fn create_convex_mesh(&mut self) -> EngineResult<MeshHandle>;

    /// Replace the planes of a convex mesh. `planes` must be unmapped.
    fn update_convex_mesh(
        &mut self,
        mesh: MeshHandle,
        planes: &HostBuffer<Plane>,
        plane_count: usize,
        bounds: &Aabb,
    ) -> EngineResult<()>;

    fn create_triangle_mesh(&mut self) -> EngineResult<MeshHandle>;

    /// Replace the triangles of a triangle mesh. Both buffers must be unmapped.
    fn update_triangle_mesh(
        &mut self,
        mesh: MeshHandle,
        vertices: &HostBuffer<[f32; 4]>,
        indices: &HostBuffer<i32>,
        vertex_count: usize,
        face_count: usize,
        bounds: &Aabb,
    ) -> EngineResult<()>;

    /// Publish the live rows of the shape slot table
    fn set_shapes(&mut self, shapes: &ShapeTableView<'_>) -> EngineResult<()>;
}
