//! Vertex Table - typed input boundary for the mesh builders
//!
//! External collaborators (scripting bindings, asset loaders) expose their
//! vertex lists through [`VertexTable`]. Positions are 1-based, matching the
//! host convention; the builders translate to 0-based buffer indices.

use glam::Vec3;

use crate::error::{EngineError, EngineResult};

pub trait VertexTable {
    /// Number of vertices in the table
    fn len(&self) -> usize;

    /// Vertex at 1-based `position`, `None` when out of range
    fn vertex(&self, position: usize) -> Option<Vec3>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read the vertex at 0-based `index`
pub fn read_vertex<V: VertexTable + ?Sized>(table: &V, index: usize) -> EngineResult<Vec3> {
    table
        .vertex(index + 1)
        .ok_or_else(|| EngineError::BufferAccess {
            index,
            size: table.len(),
        })
}

#[inline]
fn one_based<T>(items: &[T], position: usize) -> Option<&T> {
    position.checked_sub(1).and_then(|i| items.get(i))
}

impl VertexTable for [Vec3] {
    fn len(&self) -> usize {
        <[Vec3]>::len(self)
    }

    fn vertex(&self, position: usize) -> Option<Vec3> {
        one_based(self, position).copied()
    }
}

impl VertexTable for [[f32; 3]] {
    fn len(&self) -> usize {
        <[[f32; 3]]>::len(self)
    }

    fn vertex(&self, position: usize) -> Option<Vec3> {
        one_based(self, position).map(|v| Vec3::from_array(*v))
    }
}

impl<const N: usize> VertexTable for [Vec3; N] {
    fn len(&self) -> usize {
        N
    }

    fn vertex(&self, position: usize) -> Option<Vec3> {
        one_based(self.as_slice(), position).copied()
    }
}

impl VertexTable for Vec<Vec3> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn vertex(&self, position: usize) -> Option<Vec3> {
        self.as_slice().vertex(position)
    }
}

impl VertexTable for Vec<[f32; 3]> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn vertex(&self, position: usize) -> Option<Vec3> {
        self.as_slice().vertex(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_positions() {
        let table = vec![Vec3::X, Vec3::Y, Vec3::Z];
        assert_eq!(table.vertex(0), None);
        assert_eq!(table.vertex(1), Some(Vec3::X));
        assert_eq!(table.vertex(3), Some(Vec3::Z));
        assert_eq!(table.vertex(4), None);
    }

    #[test]
    fn test_read_vertex_is_zero_based() {
        let table = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let slice: &[[f32; 3]] = &table;
        assert_eq!(read_vertex(slice, 1).expect("in range"), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(
            read_vertex(slice, 2),
            Err(EngineError::BufferAccess { index: 2, size: 2 })
        );
    }
}
