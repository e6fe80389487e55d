//! Configurable chains of mirror, transform and repair steps.
//!
//! A [`Pipeline`] runs a [`PipelineConfig`]: an ordered list of [`Step`]s plus
//! the weld settings shared by every mirror step. Configurations are plain
//! data and load from TOML, so a multi-scale study can be described in a
//! file and rerun with a different tolerance.
//!
//! # Presets
//!
//! [`coarse`], [`medium`] and [`fine`] build the three resolution levels of a
//! mirrored representative volume; [`multi_scale`] runs the fine chain once
//! and records the other two levels as checkpoints on the way.
//!
//! # Example
//!
//! ```
//! use tetmesh_pipeline::{Pipeline, medium};
//! use tetmesh_types::{block_mesh, MeshBounds, Vector3};
//!
//! let rve = block_mesh([2, 2, 2], Vector3::new(1.0, 1.0, 1.0));
//! let output = Pipeline::new(medium(1e-6)).run(&rve).unwrap();
//!
//! // Eight times the coarse elements, same extent as coarse
//! assert_eq!(output.mesh.tetrahedra.len(), 16 * rve.tetrahedra.len());
//! assert!((output.mesh.bounds().max.x - 2.0).abs() < 1e-12);
//! assert!((output.mesh.bounds().max.y - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod pipeline;
mod presets;
mod step;

pub use config::{DEFAULT_TOLERANCE, DEFAULT_VOLUME_TOLERANCE, PipelineConfig, recommended_tolerance};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineOutput};
pub use presets::{Level, coarse, fine, medium, multi_scale};
pub use step::{PlanePolicy, Step};
