//! Simulation Context Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in simulation_operations.rs

use std::sync::Arc;

use parking_lot::RwLock;

use crate::physics::{Prop, ShapeTableData};
use crate::SimulationConfig;

/// Everything shape ingestion touches: the props, their slot table and the simulator.
///
/// Operations take the context by `&mut`, so there is exactly one writer.
/// `props[i]` always describes slot `i` of `shape_table`.
pub struct SimulationContext<S> {
    pub config: SimulationConfig,

    /// Physics backend that owns meshes and consumes the table
    pub simulator: S,

    /// Append-only prop sequence; its length is the prop count
    pub props: Vec<Prop>,

    /// Host copy of the shape slot table
    pub shape_table: ShapeTableData,
}

/// Thread-safe shared context (Arc<RwLock<>>)
pub type SharedSimulationContext<S> = Arc<RwLock<SimulationContext<S>>>;
