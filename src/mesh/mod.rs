//! Mesh Module - turns raw vertex streams into simulator geometry
//!
//! - convex_mesh_operations: one plane per triangle face
//! - concave_mesh_operations: vertex + winding-corrected index buffers

pub mod concave_mesh_operations;
pub mod convex_mesh_operations;
pub mod vertex_table;

pub use concave_mesh_operations::{correct_winding, write_triangle_buffers};
pub use convex_mesh_operations::{checked_face_plane, face_plane, write_convex_planes};
pub use vertex_table::{read_vertex, VertexTable};

use crate::constants::shapes::VERTICES_PER_FACE;
use crate::error::{EngineError, EngineResult};

/// Number of triangle faces in a stream of `vertex_count` vertices.
/// The stream must be non-empty and a multiple of 3.
pub fn face_count(vertex_count: usize) -> EngineResult<usize> {
    if vertex_count == 0 {
        return Err(EngineError::InvalidInput {
            field: "vertices".to_string(),
            reason: "vertex table is empty".to_string(),
        });
    }
    if vertex_count % VERTICES_PER_FACE != 0 {
        return Err(EngineError::InvalidInput {
            field: "vertices".to_string(),
            reason: format!(
                "{} vertices do not form whole triangles ({} left over)",
                vertex_count,
                vertex_count % VERTICES_PER_FACE
            ),
        });
    }
    Ok(vertex_count / VERTICES_PER_FACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_count() {
        assert_eq!(face_count(3), Ok(1));
        assert_eq!(face_count(12), Ok(4));
        assert!(face_count(0).is_err());
        assert!(face_count(7).is_err());
    }
}
