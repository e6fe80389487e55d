//! Error types for mesh transformation operations.

use thiserror::Error;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur during mesh transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Scale factor is zero or not finite.
    #[error("invalid scale factor {factor}: must be finite and non-zero")]
    InvalidScale {
        /// The rejected factor.
        factor: f64,
    },

    /// Snap tolerance is negative or not finite.
    #[error("invalid snap tolerance {tolerance}: must be finite and non-negative")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },

    /// Operation needs at least one vertex.
    #[error("mesh is empty")]
    EmptyMesh,
}
