//! Shape Slot Table Operations - Pure DOP Functions
//!
//! Rows are appended only while the table is mapped, and the world slot
//! invariant is enforced here rather than in the individual builders.

use glam::{Quat, Vec4};

use super::shape_data::{GeometryDescriptor, ShapeFlags};
use super::shape_table_data::{
    MappedShapeTable, RowRequest, ShapeRow, ShapeTableData, ShapeTableView,
};
use crate::constants::shapes::WORLD_SLOT;
use crate::error::{EngineError, EngineResult};

/// Create an empty table with every array sized to `capacity`
pub fn create_shape_table(capacity: usize) -> ShapeTableData {
    ShapeTableData {
        capacity,
        count: 0,
        flags: vec![ShapeFlags::default(); capacity],
        geometry: vec![GeometryDescriptor::default(); capacity],
        positions: vec![Vec4::ZERO; capacity],
        rotations: vec![Quat::IDENTITY; capacity],
        prev_positions: vec![Vec4::ZERO; capacity],
        prev_rotations: vec![Quat::IDENTITY; capacity],
        mapped: false,
        generation: 0,
    }
}

/// Check if another row fits
pub fn has_capacity(table: &ShapeTableData) -> bool {
    table.count < table.capacity
}

/// Slot 0 holds the static world shape
#[inline]
pub fn is_world_slot(slot: usize) -> bool {
    slot == WORLD_SLOT
}

/// Dynamic flag actually stored for `slot`: the world slot is never dynamic
#[inline]
pub fn resolve_dynamic(slot: usize, requested: bool) -> bool {
    requested && !is_world_slot(slot)
}

/// Acquire write access. Fails if a previous guard leaked its mapping.
pub fn map_shape_table(table: &mut ShapeTableData) -> EngineResult<MappedShapeTable<'_>> {
    if table.mapped {
        return Err(EngineError::StateError {
            expected: "unmapped shape table".to_string(),
            actual: "shape table already mapped".to_string(),
        });
    }
    table.mapped = true;
    Ok(MappedShapeTable { table })
}

impl Drop for MappedShapeTable<'_> {
    fn drop(&mut self) {
        self.table.mapped = false;
        self.table.generation += 1;
    }
}

/// Append one row at index `count` with default transforms.
/// Returns the assigned slot.
pub fn append_row(mapped: &mut MappedShapeTable<'_>, request: RowRequest) -> EngineResult<usize> {
    let table = &mut *mapped.table;
    if !has_capacity(table) {
        return Err(EngineError::ResourceExhausted(format!(
            "shape slot table full ({} of {} slots used)",
            table.count, table.capacity
        )));
    }

    let slot = table.count;
    let dynamic = resolve_dynamic(slot, request.dynamic);
    if dynamic != request.dynamic {
        log::warn!(
            "[append_row] Slot {} is reserved for the static world; storing {:?} as static",
            slot,
            request.geometry.kind
        );
    }

    table.flags[slot] = ShapeFlags::new(request.geometry.kind, dynamic);
    table.geometry[slot] = request.geometry;
    table.positions[slot] = Vec4::ZERO;
    table.rotations[slot] = Quat::IDENTITY;
    table.prev_positions[slot] = Vec4::ZERO;
    table.prev_rotations[slot] = Quat::IDENTITY;
    table.count += 1;

    Ok(slot)
}

/// Move the current transform of `slot` into the previous one and write the new transform.
/// Flags and geometry are left alone.
pub fn write_transform(
    mapped: &mut MappedShapeTable<'_>,
    slot: usize,
    position: Vec4,
    rotation: Quat,
) -> EngineResult<()> {
    let table = &mut *mapped.table;
    if slot >= table.count {
        return Err(EngineError::BufferAccess {
            index: slot,
            size: table.count,
        });
    }

    table.prev_positions[slot] = table.positions[slot];
    table.prev_rotations[slot] = table.rotations[slot];
    table.positions[slot] = position;
    table.rotations[slot] = rotation;
    Ok(())
}

/// Copy out one live row
pub fn shape_table_row(table: &ShapeTableData, slot: usize) -> EngineResult<ShapeRow> {
    ensure_unmapped(table)?;
    if slot >= table.count {
        return Err(EngineError::BufferAccess {
            index: slot,
            size: table.count,
        });
    }

    Ok(ShapeRow {
        flags: table.flags[slot],
        geometry: table.geometry[slot],
        position: table.positions[slot],
        rotation: table.rotations[slot],
        prev_position: table.prev_positions[slot],
        prev_rotation: table.prev_rotations[slot],
    })
}

/// Borrow the live rows for publishing to the simulator
pub fn active_rows(table: &ShapeTableData) -> EngineResult<ShapeTableView<'_>> {
    ensure_unmapped(table)?;
    let n = table.count;
    Ok(ShapeTableView {
        flags: &table.flags[..n],
        geometry: &table.geometry[..n],
        positions: &table.positions[..n],
        rotations: &table.rotations[..n],
        prev_positions: &table.prev_positions[..n],
        prev_rotations: &table.prev_rotations[..n],
        generation: table.generation,
    })
}

fn ensure_unmapped(table: &ShapeTableData) -> EngineResult<()> {
    if table.mapped {
        return Err(EngineError::StateError {
            expected: "unmapped shape table".to_string(),
            actual: "shape table is mapped".to_string(),
        });
    }
    Ok(())
}

impl ShapeTableView<'_> {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shape_data::{MeshHandle, ShapeKind};

    fn request(kind: ShapeKind, mesh: u32, dynamic: bool) -> RowRequest {
        RowRequest {
            geometry: GeometryDescriptor {
                kind,
                mesh: MeshHandle(mesh),
                scale: [1.0, 1.0, 1.0],
            },
            dynamic,
        }
    }

    #[test]
    fn test_new_table_has_identity_rotations() {
        let table = create_shape_table(8);
        assert_eq!(table.count, 0);
        assert!(table.rotations.iter().all(|q| *q == Quat::IDENTITY));
        assert!(table.prev_rotations.iter().all(|q| *q == Quat::IDENTITY));
    }

    #[test]
    fn test_append_assigns_sequential_slots() {
        let mut table = create_shape_table(4);
        {
            let mut mapped = map_shape_table(&mut table).expect("map");
            let a = append_row(&mut mapped, request(ShapeKind::TriangleMesh, 0, true)).expect("row");
            let b = append_row(&mut mapped, request(ShapeKind::ConvexMesh, 1, true)).expect("row");
            assert_eq!((a, b), (0, 1));
        }
        assert_eq!(table.count, 2);
        assert!(!table.mapped);
        assert_eq!(table.generation, 1);

        let row = shape_table_row(&table, 1).expect("live row");
        assert_eq!(row.flags.kind(), Some(ShapeKind::ConvexMesh));
        assert_eq!(row.geometry.mesh, MeshHandle(1));
        assert_eq!(row.rotation, Quat::IDENTITY);
        assert_eq!(row.prev_rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_world_slot_is_never_dynamic() {
        let mut table = create_shape_table(4);
        {
            let mut mapped = map_shape_table(&mut table).expect("map");
            append_row(&mut mapped, request(ShapeKind::ConvexMesh, 0, true)).expect("row");
            append_row(&mut mapped, request(ShapeKind::ConvexMesh, 1, true)).expect("row");
        }
        assert!(!table.flags[0].is_dynamic());
        assert!(table.flags[1].is_dynamic());
        assert!(!resolve_dynamic(0, true));
        assert!(resolve_dynamic(3, true));
        assert!(!resolve_dynamic(3, false));
    }

    #[test]
    fn test_capacity_exhaustion() {
        let mut table = create_shape_table(1);
        let mut mapped = map_shape_table(&mut table).expect("map");
        append_row(&mut mapped, request(ShapeKind::TriangleMesh, 0, false)).expect("row");
        let err = append_row(&mut mapped, request(ShapeKind::TriangleMesh, 1, false))
            .expect_err("table is full");
        assert!(matches!(err, EngineError::ResourceExhausted(_)));
        drop(mapped);
        assert_eq!(table.count, 1);
    }

    #[test]
    fn test_write_transform_shifts_previous() {
        let mut table = create_shape_table(2);
        let rotation = Quat::from_rotation_y(0.5);
        {
            let mut mapped = map_shape_table(&mut table).expect("map");
            append_row(&mut mapped, request(ShapeKind::ConvexMesh, 0, true)).expect("row");
            write_transform(&mut mapped, 0, Vec4::new(1.0, 2.0, 3.0, 0.0), rotation)
                .expect("live slot");
            assert!(write_transform(&mut mapped, 1, Vec4::ZERO, Quat::IDENTITY).is_err());
        }
        let row = shape_table_row(&table, 0).expect("live row");
        assert_eq!(row.position, Vec4::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(row.rotation, rotation);
        assert_eq!(row.prev_position, Vec4::ZERO);
        assert_eq!(row.prev_rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_reads_refused_while_mapped() {
        let mut table = create_shape_table(2);
        std::mem::forget(map_shape_table(&mut table).expect("map"));
        assert!(matches!(
            active_rows(&table),
            Err(EngineError::StateError { .. })
        ));
        assert!(map_shape_table(&mut table).is_err());
    }

    #[test]
    fn test_active_rows_only_live() {
        let mut table = create_shape_table(16);
        {
            let mut mapped = map_shape_table(&mut table).expect("map");
            append_row(&mut mapped, request(ShapeKind::TriangleMesh, 0, true)).expect("row");
        }
        let view = active_rows(&table).expect("unmapped");
        assert_eq!(view.len(), 1);
        assert_eq!(view.rotations.len(), 1);
    }
}
