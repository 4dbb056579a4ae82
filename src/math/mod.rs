//! Math Module - pure vector functions used by the mesh builders

pub mod error;
pub mod vector_operations;

pub use error::{GeometryError, GeometryResult};
pub use vector_operations::{cross, dot, face_normal, length, normalize, sub, try_normalize};
