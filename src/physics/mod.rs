//! Physics Module - shapes, host buffers and the shape slot table

pub mod aabb;
pub mod host_buffer;
pub mod prop_data;
pub mod recording_simulator;
pub mod shape_data;
pub mod shape_table_data;
pub mod shape_table_operations;
pub mod simulator;

// Simple re-exports
pub use aabb::{Aabb, aabb_from_points, create_aabb, validate_aabb};
pub use host_buffer::{HostBuffer, MappedBuffer};
pub use prop_data::{Prop, PropBuffers};
pub use recording_simulator::{
    PublishedShapes, RecordedConvexMesh, RecordedMesh, RecordedTriangleMesh, RecordingSimulator,
};
pub use shape_data::{GeometryDescriptor, MeshHandle, Plane, ShapeFlags, ShapeKind};
pub use shape_table_data::{MappedShapeTable, RowRequest, ShapeRow, ShapeTableData, ShapeTableView};
pub use simulator::Simulator;

// Re-export DOP operations
pub use shape_table_operations::{
    active_rows, append_row, create_shape_table, has_capacity, is_world_slot, map_shape_table,
    resolve_dynamic, shape_table_row, write_transform,
};
