//! Error types for pipeline configuration and execution.

use std::path::PathBuf;

use tetmesh_repair::RepairError;
use tetmesh_transform::TransformError;
use tetmesh_weld::WeldError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can occur while loading or running a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration file could not be read.
    #[error("failed to read pipeline config {path}: {source}")]
    ReadConfig {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for a pipeline.
    #[error("invalid pipeline config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Weld tolerance is negative or not finite.
    #[error("invalid pipeline tolerance {tolerance}: must be finite and non-negative")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },

    /// A step needs mesh bounds but the mesh has no vertices.
    #[error("step {step} ({name}) needs a non-empty mesh")]
    EmptyMesh {
        /// Zero-based step index.
        step: usize,
        /// Step name.
        name: &'static str,
    },

    /// A transform step failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A mirror-and-merge step failed.
    #[error(transparent)]
    Weld(#[from] WeldError),

    /// A repair step failed.
    #[error(transparent)]
    Repair(#[from] RepairError),
}
