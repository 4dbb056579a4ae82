//! GPU Module - device-side mirror of meshes and the shape slot table

pub mod shape_upload_data;
pub mod shape_upload_operations;
#[cfg(feature = "gpu")]
pub mod wgpu_simulator;

pub use shape_upload_data::{GpuGeometry, PackedShapes};
pub use shape_upload_operations::{pack_geometry, pack_quats, pack_shapes, pack_vec4s};
#[cfg(feature = "gpu")]
pub use wgpu_simulator::{create_shape_buffers, GpuMesh, GpuShapeBuffers, WgpuSimulator};
