//! Error handling for shape ingestion and slot management
//!
//! Every failure is returned to the caller synchronously. A failed operation
//! leaves the prop sequence and the shape slot table exactly as they were.

use std::error::Error as StdError;
use std::fmt;

use crate::math::GeometryError;

/// Main error type for Prop Physics
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    // Input Errors
    InvalidInput {
        field: String,
        reason: String,
    },
    BufferAccess {
        index: usize,
        size: usize,
    },

    // Geometry Errors
    DegenerateGeometry {
        face: usize,
        reason: String,
    },

    // Resource Errors
    ResourceExhausted(String),
    ResourceNotFound {
        resource_type: String,
        id: String,
    },
    BufferError {
        operation: String,
        error: String,
    },
    StateError {
        expected: String,
        actual: String,
    },

    // GPU Errors
    BufferCreationFailed {
        size: u64,
        usage: String,
    },
    GpuOperationFailed {
        operation: String,
        error: String,
    },

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput { field, reason } => {
                write!(f, "Invalid input for {}: {}", field, reason)
            }
            EngineError::BufferAccess { index, size } => write!(
                f,
                "Buffer access out of bounds: index {} >= size {}",
                index, size
            ),

            EngineError::DegenerateGeometry { face, reason } => {
                write!(f, "Degenerate geometry at face {}: {}", face, reason)
            }

            EngineError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),
            EngineError::ResourceNotFound { resource_type, id } => {
                write!(f, "Resource not found: {} '{}'", resource_type, id)
            }
            EngineError::BufferError { operation, error } => {
                write!(f, "Buffer error during {}: {}", operation, error)
            }
            EngineError::StateError { expected, actual } => {
                write!(f, "State error: expected {}, actual {}", expected, actual)
            }

            EngineError::BufferCreationFailed { size, usage } => {
                write!(f, "Buffer creation failed: size={}, usage={}", size, usage)
            }
            EngineError::GpuOperationFailed { operation, error } => {
                write!(f, "GPU operation '{}' failed: {}", operation, error)
            }

            EngineError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            EngineError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for EngineError {}

/// Type alias for Results in Prop Physics
pub type EngineResult<T> = Result<T, EngineError>;

impl From<GeometryError> for EngineError {
    fn from(error: GeometryError) -> Self {
        EngineError::InvalidInput {
            field: "geometry".to_string(),
            reason: error.to_string(),
        }
    }
}

// Helper functions for common error patterns

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError,
    {
        self.ok_or_else(f)
    }
}

/// Extension trait for adding context to foreign errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> EngineResult<T>;
    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn context(self, msg: &str) -> EngineResult<T> {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", msg, e),
        })
    }

    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}
