//! GPU Shape Upload Operations - Pure DOP Functions
//!
//! Convert the shape table's host arrays into the layouts the device buffers use.

use glam::{Quat, Vec4};

use super::shape_upload_data::{GpuGeometry, PackedShapes};
use crate::physics::{GeometryDescriptor, ShapeTableView};

pub fn pack_geometry(geometry: &[GeometryDescriptor]) -> Vec<GpuGeometry> {
    geometry
        .iter()
        .map(|g| GpuGeometry {
            mesh: g.mesh.0,
            kind: g.kind as u32,
            _padding: [0; 2],
            scale: [g.scale[0], g.scale[1], g.scale[2], 0.0],
        })
        .collect()
}

pub fn pack_vec4s(values: &[Vec4]) -> Vec<[f32; 4]> {
    values.iter().map(|v| v.to_array()).collect()
}

/// Quaternions in (x, y, z, w) order
pub fn pack_quats(values: &[Quat]) -> Vec<[f32; 4]> {
    values.iter().map(|q| q.to_array()).collect()
}

/// Pack every live row of `view`
pub fn pack_shapes(view: &ShapeTableView<'_>) -> PackedShapes {
    PackedShapes {
        flags: view.flags.iter().map(|f| f.0).collect(),
        geometry: pack_geometry(view.geometry),
        positions: pack_vec4s(view.positions),
        rotations: pack_quats(view.rotations),
        prev_positions: pack_vec4s(view.prev_positions),
        prev_rotations: pack_quats(view.prev_rotations),
    }
}
