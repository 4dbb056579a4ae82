//! GPU Shape Upload Data - Pure DOP
//!
//! NO METHODS. Just the Pod layouts written into device storage buffers.
//! Packing happens in shape_upload_operations.rs

use bytemuck::{Pod, Zeroable};

/// Geometry descriptor as laid out in the device geometry buffer.
/// 32 bytes, 16-byte aligned for WGSL `vec4<f32>` access.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuGeometry {
    pub mesh: u32,
    pub kind: u32,
    pub _padding: [u32; 2],
    /// xyz scale, w unused
    pub scale: [f32; 4],
}

/// Packed copies of the live shape rows, ready for `Queue::write_buffer`
#[derive(Debug, Default)]
pub struct PackedShapes {
    pub flags: Vec<u32>,
    pub geometry: Vec<GpuGeometry>,
    pub positions: Vec<[f32; 4]>,
    pub rotations: Vec<[f32; 4]>,
    pub prev_positions: Vec<[f32; 4]>,
    pub prev_rotations: Vec<[f32; 4]>,
}

static_assertions::assert_eq_size!(GpuGeometry, [u32; 8]);
static_assertions::const_assert_eq!(std::mem::size_of::<GpuGeometry>() % 16, 0);
