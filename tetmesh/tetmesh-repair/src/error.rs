//! Error types for mesh diagnostics and repair.

use tetmesh_types::MeshError;
use tetmesh_weld::WeldError;
use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during mesh diagnostics and repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Volume or distance tolerance is negative or not finite.
    #[error("invalid tolerance {tolerance}: must be finite and non-negative")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },

    /// The mesh has dangling indices or misaligned region tags.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Duplicate-point search or vertex compaction failed.
    #[error(transparent)]
    Weld(#[from] WeldError),
}

pub(crate) fn check_tolerance(tolerance: f64) -> RepairResult<()> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(RepairError::InvalidTolerance { tolerance })
    }
}
