//! Constants shared by the mesh builders, the shape slot table and the GPU backend

/// Shape slot table constants
pub mod shapes {
    /// Identity quaternion in (x, y, z, w) order.
    /// The simulator destabilizes on a zero quaternion, so every rotation slot starts here.
    pub const IDENTITY_ROTATION: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// Per-axis scale applied to newly registered meshes
    pub const DEFAULT_SCALE: [f32; 3] = [1.0, 1.0, 1.0];

    /// Slot reserved for the static world/environment shape
    pub const WORLD_SLOT: usize = 0;

    /// Default capacity of the shape slot table
    pub const DEFAULT_MAX_SHAPES: usize = 4096;

    /// Vertices consumed per triangle face
    pub const VERTICES_PER_FACE: usize = 3;
}

/// Bit layout of packed shape flags
pub mod flags {
    /// Bits 0-2: shape kind
    pub const TYPE_MASK: u32 = 0x7;
    /// Bit 3: body moves with the simulation
    pub const DYNAMIC: u32 = 0x8;
}

/// Geometry tolerances
pub mod geometry {
    /// Faces with an area at or below this are rejected as degenerate
    pub const MIN_FACE_AREA: f32 = 1.0e-8;
}

/// GPU limits used when validating configuration
pub mod gpu_limits {
    /// Conservative storage-buffer binding limit (128 MB, the WebGPU default)
    pub const MAX_BUFFER_BINDING_SIZE: u64 = 128 * 1024 * 1024;
}
