//! Concave Mesh Operations - Pure DOP Functions
//!
//! Source triangles arrive counter-clockwise; the simulator expects clockwise.
//! The fix swaps the first two indices of every triangle and leaves vertex
//! positions untouched.

use super::face_count;
use super::vertex_table::{read_vertex, VertexTable};
use crate::constants::shapes::VERTICES_PER_FACE;
use crate::error::{EngineError, EngineResult};

/// Swap indices `i` and `i - 1` when `i` is the second corner of a triangle
#[inline]
fn swap_winding_at(indices: &mut [i32], i: usize) {
    if i % 3 == 1 {
        indices.swap(i, i - 1);
    }
}

/// Flip the winding of every whole triangle in `indices`.
/// Applying it twice restores the original order.
pub fn correct_winding(indices: &mut [i32]) {
    for i in 0..indices.len() {
        swap_winding_at(indices, i);
    }
}

/// Fill the vertex buffer (`w = 0`) and the winding-corrected index buffer.
/// Returns the face count.
pub fn write_triangle_buffers<V: VertexTable + ?Sized>(
    vertices: &V,
    vertex_out: &mut [[f32; 4]],
    index_out: &mut [i32],
) -> EngineResult<usize> {
    let count = vertices.len();
    let faces = face_count(count)?;
    if vertex_out.len() < count || index_out.len() < count {
        return Err(EngineError::BufferAccess {
            index: count,
            size: vertex_out.len().min(index_out.len()),
        });
    }
    if count > i32::MAX as usize {
        return Err(EngineError::InvalidInput {
            field: "vertices".to_string(),
            reason: format!("{} vertices exceed the index range", count),
        });
    }

    for i in 0..count {
        let v = read_vertex(vertices, i)?;
        if !v.is_finite() {
            return Err(EngineError::DegenerateGeometry {
                face: i / VERTICES_PER_FACE,
                reason: format!("non-finite vertex {:?}", v),
            });
        }
        vertex_out[i] = [v.x, v.y, v.z, 0.0];
        index_out[i] = i as i32;
        swap_winding_at(index_out, i);
    }

    log::debug!("[write_triangle_buffers] {} vertices, {} faces", count, faces);
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn two_triangles() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_index_order_per_triangle() {
        let input = two_triangles();
        let mut verts = vec![[0.0f32; 4]; 6];
        let mut indices = vec![0i32; 6];
        let faces = write_triangle_buffers(&input, &mut verts, &mut indices).expect("valid");
        assert_eq!(faces, 2);
        assert_eq!(indices, vec![1, 0, 2, 4, 3, 5]);
    }

    #[test]
    fn test_vertices_unchanged() {
        let input = two_triangles();
        let mut verts = vec![[9.0f32; 4]; 6];
        let mut indices = vec![0i32; 6];
        write_triangle_buffers(&input, &mut verts, &mut indices).expect("valid");
        for (out, v) in verts.iter().zip(&input) {
            assert_eq!(*out, [v.x, v.y, v.z, 0.0]);
        }
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let mut input = two_triangles();
        input[4] = Vec3::new(f32::INFINITY, 0.0, 1.0);
        let mut verts = vec![[0.0f32; 4]; 6];
        let mut indices = vec![0i32; 6];
        assert!(matches!(
            write_triangle_buffers(&input, &mut verts, &mut indices),
            Err(EngineError::DegenerateGeometry { face: 1, .. })
        ));

        input[4] = Vec3::new(1.0, f32::NAN, 1.0);
        assert!(write_triangle_buffers(&input, &mut verts, &mut indices).is_err());
    }

    #[test]
    fn test_double_correction_restores_order() {
        let original: Vec<i32> = (0..12).collect();
        let mut indices = original.clone();
        correct_winding(&mut indices);
        assert_ne!(indices, original);
        correct_winding(&mut indices);
        assert_eq!(indices, original);
    }

    #[test]
    fn test_reverses_triangle_orientation() {
        let input = two_triangles();
        let mut verts = vec![[0.0f32; 4]; 6];
        let mut indices = vec![0i32; 6];
        write_triangle_buffers(&input, &mut verts, &mut indices).expect("valid");

        for tri in 0..2 {
            let corner = |k: usize| Vec3::from_slice(&verts[indices[tri * 3 + k] as usize][..3]);
            let src = |k: usize| input[tri * 3 + k];
            let out_n = (corner(1) - corner(0)).cross(corner(2) - corner(0));
            let in_n = (src(1) - src(0)).cross(src(2) - src(0));
            assert!(out_n.dot(in_n) < 0.0, "triangle {} kept its winding", tri);
        }
    }

    #[test]
    fn test_rejects_partial_triangle_and_short_buffers() {
        let mut input = two_triangles();
        input.pop();
        let mut verts = vec![[0.0f32; 4]; 6];
        let mut indices = vec![0i32; 6];
        assert!(matches!(
            write_triangle_buffers(&input, &mut verts, &mut indices),
            Err(EngineError::InvalidInput { .. })
        ));

        let input = two_triangles();
        let mut short = vec![0i32; 3];
        assert!(matches!(
            write_triangle_buffers(&input, &mut verts, &mut short),
            Err(EngineError::BufferAccess { .. })
        ));
    }
}
