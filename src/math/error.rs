/// Geometry Error Handling
///
/// Failures of the checked vector operations. Builders translate these into
/// `EngineError` with the offending face attached.

/// Geometry-specific result type
pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Vector length {length} is at or below tolerance {epsilon}")]
    ZeroLength { length: f32, epsilon: f32 },

    #[error("Vector has non-finite components")]
    NonFinite,
}
