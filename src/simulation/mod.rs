//! Simulation Module - prop registration against a Simulator backend
//!
//! - simulation_context_data: the context every operation takes by `&mut`
//! - simulation_operations: add_mesh_convex / add_mesh_concave and friends

pub mod simulation_context_data;
pub mod simulation_operations;


pub use simulation_context_data::{SharedSimulationContext, SimulationContext};
pub use simulation_operations::{
    add_mesh_concave, add_mesh_convex, create_shared_context, create_simulation_context,
    flush_shapes, prop, prop_count, set_prop_transform, shape_row,
};
