//! Prop Data - Pure DOP
//!
//! NO METHODS. Just data.
//! Props are created by simulation_operations and appended to the context.

use glam::{Quat, Vec4};

use super::host_buffer::HostBuffer;
use super::shape_data::{MeshHandle, Plane, ShapeKind};

/// One physical object and the buffers its mesh was built from
#[derive(Debug)]
pub struct Prop {
    pub position: Vec4,
    pub rotation: Quat,
    pub prev_position: Vec4,
    pub prev_rotation: Quat,

    pub kind: ShapeKind,
    pub mesh: MeshHandle,

    /// Source buffers, kept alive for the lifetime of the prop
    pub buffers: PropBuffers,
}

/// Host buffers owned by a prop
#[derive(Debug)]
pub enum PropBuffers {
    Convex {
        planes: HostBuffer<Plane>,
    },
    Triangle {
        vertices: HostBuffer<[f32; 4]>,
        indices: HostBuffer<i32>,
    },
}
