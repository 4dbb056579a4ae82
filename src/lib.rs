// Prop Physics - Data-Oriented Programming (DOP) Architecture
//
// Shape ingestion for a GPU particle/rigid-body simulator.
// - mesh: raw vertex streams -> convex planes / triangle buffers
// - physics: shape slot table, host buffers, the Simulator seam
// - simulation: SimulationContext and the add_mesh_* entry points
//
// Data lives in *_data modules; transformations are free functions in
// *_operations modules.

// Constants module
pub mod constants;

// Core modules
pub mod error;
pub mod math;

// Geometry ingestion
pub mod mesh;
pub mod physics;
pub mod simulation;

// GPU backend
pub mod gpu;

use anyhow::Result;
use serde::Deserialize;

pub use error::{EngineError, EngineResult, ErrorContext, OptionExt};
pub use mesh::VertexTable;
pub use physics::{
    Aabb, MeshHandle, Plane, Prop, RecordingSimulator, ShapeFlags, ShapeKind, ShapeRow,
    Simulator,
};
pub use simulation::{
    add_mesh_concave, add_mesh_convex, create_shared_context, create_simulation_context,
    flush_shapes, prop, prop_count, set_prop_transform, shape_row, SharedSimulationContext,
    SimulationContext,
};

#[cfg(feature = "gpu")]
pub use gpu::WgpuSimulator;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Capacity of the shape slot table
    pub max_shapes: usize,
    /// Faces with an area at or below this are rejected as degenerate
    pub min_face_area: f32,
    /// Scale written into the geometry descriptor of every new row
    pub default_scale: [f32; 3],
}

impl SimulationConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_shapes == 0 {
            return Err(anyhow::anyhow!("SimulationConfig: max_shapes cannot be 0"));
        }

        // The geometry descriptor is the widest per-row device element
        let row_bytes = std::mem::size_of::<gpu::GpuGeometry>() as u64;
        let max_safe_shapes = constants::gpu_limits::MAX_BUFFER_BINDING_SIZE / row_bytes;

        log::info!(
            "[SimulationConfig] Validation: max_shapes={}, row_bytes={}, max_safe_shapes={}",
            self.max_shapes,
            row_bytes,
            max_safe_shapes
        );

        if self.max_shapes as u64 > max_safe_shapes {
            return Err(anyhow::anyhow!(
                "SimulationConfig: max_shapes {} exceeds GPU memory limit. Maximum is {}",
                self.max_shapes,
                max_safe_shapes
            ));
        }

        if !self.min_face_area.is_finite() || self.min_face_area < 0.0 {
            return Err(anyhow::anyhow!(
                "SimulationConfig: min_face_area must be finite and non-negative, got {}",
                self.min_face_area
            ));
        }

        if self
            .default_scale
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(anyhow::anyhow!(
                "SimulationConfig: default_scale components must be positive, got {:?}",
                self.default_scale
            ));
        }

        log::info!("[SimulationConfig] Configuration validated successfully");
        Ok(())
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse simulation config")?;
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_shapes: constants::shapes::DEFAULT_MAX_SHAPES,
            min_face_area: constants::geometry::MIN_FACE_AREA,
            default_scale: constants::shapes::DEFAULT_SCALE,
        }
    }
}
