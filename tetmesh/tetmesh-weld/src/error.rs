//! Error types for welding and merging.

use tetmesh_types::MeshError;
use thiserror::Error;

/// Result type for weld and merge operations.
pub type WeldResult<T> = Result<T, WeldError>;

/// Errors that can occur while welding or merging meshes.
#[derive(Debug, Error)]
pub enum WeldError {
    /// Weld tolerance is negative or not finite.
    #[error("invalid weld tolerance {tolerance}: must be finite and non-negative")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },

    /// The number of welded vertices differs from the number of reference
    /// vertices on the mirror plane.
    #[error("welded {welded} vertices but {expected} lie on the mirror plane")]
    WeldCountMismatch {
        /// Reference vertices on the plane.
        expected: usize,
        /// Vertices actually welded.
        welded: usize,
    },

    /// A vertex scheduled for removal does not exist.
    #[error("dropped vertex {index} is out of range (vertex count {vertex_count})")]
    InvalidDroppedIndex {
        /// The offending index.
        index: u32,
        /// Number of vertices.
        vertex_count: usize,
    },

    /// An input or output mesh violates the data-model invariants.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
