//! Shape Slot Table Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in shape_table_operations.rs

use glam::{Quat, Vec4};

use super::shape_data::{GeometryDescriptor, ShapeFlags};

/// Fixed-capacity parallel arrays consumed by the simulator each step.
///
/// Every array is allocated at full capacity up front. Rows `0..count` are
/// live; rows past `count` hold defaults (identity rotations, unassigned mesh).
pub struct ShapeTableData {
    /// Maximum number of rows
    pub capacity: usize,

    /// Live rows, equal to the prop count
    pub count: usize,

    /// Per-row arrays (SOA)
    pub flags: Vec<ShapeFlags>,
    pub geometry: Vec<GeometryDescriptor>,
    pub positions: Vec<Vec4>,
    pub rotations: Vec<Quat>,
    pub prev_positions: Vec<Vec4>,
    pub prev_rotations: Vec<Quat>,

    /// Set while a `MappedShapeTable` guard is alive
    pub mapped: bool,

    /// Bumped on every unmap, lets backends skip unchanged uploads
    pub generation: u64,
}

/// Copy of a single row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRow {
    pub flags: ShapeFlags,
    pub geometry: GeometryDescriptor,
    pub position: Vec4,
    pub rotation: Quat,
    pub prev_position: Vec4,
    pub prev_rotation: Quat,
}

/// Borrowed view of the live rows, handed to the simulator on publish
#[derive(Debug, Clone, Copy)]
pub struct ShapeTableView<'a> {
    pub flags: &'a [ShapeFlags],
    pub geometry: &'a [GeometryDescriptor],
    pub positions: &'a [Vec4],
    pub rotations: &'a [Quat],
    pub prev_positions: &'a [Vec4],
    pub prev_rotations: &'a [Quat],
    pub generation: u64,
}

/// Request for a new row, filled in by the mesh builders
#[derive(Debug, Clone, Copy)]
pub struct RowRequest {
    pub geometry: GeometryDescriptor,
    pub dynamic: bool,
}

/// Scoped write access to the table; unmaps on drop.
/// Writes are only possible through the functions in shape_table_operations.rs.
pub struct MappedShapeTable<'a> {
    pub(super) table: &'a mut ShapeTableData,
}
