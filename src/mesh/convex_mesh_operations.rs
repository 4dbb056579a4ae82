//! Convex Mesh Operations - Pure DOP Functions
//!
//! Every 3 consecutive vertices form one face; each face becomes one plane
//! of the hull. Faces must be wound so their normals point outward.

use glam::Vec3;

use super::vertex_table::{read_vertex, VertexTable};
use super::face_count;
use crate::constants::shapes::VERTICES_PER_FACE;
use crate::error::{EngineError, EngineResult};
use crate::math::{cross, dot, normalize, sub, try_normalize};
use crate::physics::Plane;

/// Plane of the face `(v0, v1, v2)` without validation.
/// Collinear or duplicate vertices yield NaN components.
pub fn face_plane(v0: Vec3, v1: Vec3, v2: Vec3) -> Plane {
    let normal = normalize(cross(sub(v1, v0), sub(v2, v0)));
    Plane::from_outward(normal, dot(normal, v0))
}

/// Plane of the face `(v0, v1, v2)`, rejecting faces whose area is at or
/// below `min_face_area`.
pub fn checked_face_plane(
    face: usize,
    [v0, v1, v2]: [Vec3; 3],
    min_face_area: f32,
) -> EngineResult<Plane> {
    // |cross| is twice the face area
    let normal = try_normalize(cross(sub(v1, v0), sub(v2, v0)), 2.0 * min_face_area).map_err(
        |e| EngineError::DegenerateGeometry {
            face,
            reason: e.to_string(),
        },
    )?;
    Ok(Plane::from_outward(normal, dot(normal, v0)))
}

/// Compute one plane per face of `vertices` into `planes`.
/// Returns the number of planes written.
pub fn write_convex_planes<V: VertexTable + ?Sized>(
    vertices: &V,
    planes: &mut [Plane],
    min_face_area: f32,
) -> EngineResult<usize> {
    let faces = face_count(vertices.len())?;
    if planes.len() < faces {
        return Err(EngineError::BufferAccess {
            index: faces,
            size: planes.len(),
        });
    }

    for (face, plane) in planes.iter_mut().take(faces).enumerate() {
        let base = face * VERTICES_PER_FACE;
        let corners = [
            read_vertex(vertices, base)?,
            read_vertex(vertices, base + 1)?,
            read_vertex(vertices, base + 2)?,
        ];
        *plane = checked_face_plane(face, corners, min_face_area)?;
    }

    log::debug!("[write_convex_planes] {} planes from {} vertices", faces, vertices.len());
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::geometry::MIN_FACE_AREA;

    /// Two outward-wound faces of a wedge: the floor (facing -Y) and the slope.
    fn wedge_faces() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_floor_plane() {
        let faces = wedge_faces();
        let plane = face_plane(faces[0], faces[1], faces[2]);
        assert!((plane.outward_normal() - Vec3::NEG_Y).length() < 1e-6);
        assert!((plane.offset - 1.0).abs() < 1e-6);
        // Stored normal is negated
        assert!((plane.normal[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_planes_are_unit_and_pass_through_face() {
        let faces = wedge_faces();
        let mut planes = vec![Plane::default(); 2];
        let written = write_convex_planes(&faces, &mut planes, MIN_FACE_AREA).expect("valid wedge");
        assert_eq!(written, 2);

        for (face, plane) in planes.iter().enumerate() {
            let n = plane.outward_normal();
            assert!((n.length() - 1.0).abs() < 1e-5, "face {} not unit", face);
            for v in &faces[face * 3..face * 3 + 3] {
                assert!((dot(n, *v) - plane.offset).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_interior_point_is_inside_every_plane() {
        let faces = wedge_faces();
        let mut planes = vec![Plane::default(); 2];
        write_convex_planes(&faces, &mut planes, MIN_FACE_AREA).expect("valid wedge");
        let inside = Vec3::new(0.5, -0.5, 0.0);
        assert!(planes.iter().all(|p| p.distance(inside) < 0.0));
    }

    #[test]
    fn test_degenerate_face_rejected() {
        let mut faces = wedge_faces();
        // Collapse the second face onto a line
        faces[5] = Vec3::new(3.0, -1.0, 3.0);
        let mut planes = vec![Plane::default(); 2];
        let err = write_convex_planes(&faces, &mut planes, MIN_FACE_AREA)
            .expect_err("collinear face");
        assert!(matches!(err, EngineError::DegenerateGeometry { face: 1, .. }));
    }

    #[test]
    fn test_duplicate_vertices_rejected() {
        let v = Vec3::new(0.25, 0.5, 0.75);
        let err = checked_face_plane(0, [v, v, Vec3::ONE], MIN_FACE_AREA).expect_err("duplicate");
        assert!(matches!(err, EngineError::DegenerateGeometry { face: 0, .. }));
    }

    #[test]
    fn test_partial_face_rejected() {
        let mut faces = wedge_faces();
        faces.pop();
        let mut planes = vec![Plane::default(); 2];
        assert!(matches!(
            write_convex_planes(&faces, &mut planes, MIN_FACE_AREA),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}
