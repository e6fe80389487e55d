//! Error types for mesh integrity checks.

use thiserror::Error;

/// Result type for mesh integrity checks.
pub type MeshResult<T> = Result<T, MeshError>;

/// Data-integrity errors detected on a [`TetMesh`](crate::TetMesh).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// An element references a vertex that does not exist.
    #[error("element {element} references vertex {index} (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Position of the offending element.
        element: usize,
        /// The dangling vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The region tag array does not line up with the element array.
    #[error("mesh has {elements} elements but {regions} region tags")]
    RegionCountMismatch {
        /// Number of elements.
        elements: usize,
        /// Number of region tags.
        regions: usize,
    },

    /// The vertex count does not fit into `u32` element indices.
    #[error("mesh has {vertex_count} vertices, more than u32 indices can address")]
    TooManyVertices {
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}
