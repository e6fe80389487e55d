//! Vertex welding and mirror-merge for tetrahedral meshes.
//!
//! Reflecting a meshed sub-domain across a symmetry plane and fusing it with
//! the original produces duplicate vertices on the plane. This crate finds
//! them and removes them:
//!
//! - [`find_coincident_points`] / [`find_duplicate_points`] - k-d tree
//!   nearest-neighbour matching under a distance tolerance
//! - [`VertexCompaction`] - the offset table used to remap element indices
//!   after vertices are dropped
//! - [`merge_meshes`] / [`mirror_and_merge`] - plane-filtered weld and merge
//!   with an optional weld-count sanity check
//!
//! # Tolerance
//!
//! The weld tolerance must suit the local element size. Too large and
//! distinct vertices are fused; too small and coincident vertices stay
//! apart, leaving a crack that no error reports. [`MergeReport`] carries the
//! expected and actual weld counts so callers can tell.
//!
//! # Example
//!
//! ```
//! use tetmesh_types::{unit_cube, Axis, MeshTopology};
//! use tetmesh_weld::{mirror_and_merge, MergeParams};
//!
//! let params = MergeParams::on_plane(Axis::X, 1.0).with_tolerance(1e-9);
//! let outcome = mirror_and_merge(&unit_cube(), &params).unwrap();
//!
//! assert_eq!(outcome.mesh.vertex_count(), 12);
//! assert!((outcome.mesh.signed_volume() - 2.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod coincident;
mod compaction;
mod error;
mod merge;
mod spatial;

pub use coincident::{Coincidence, find_coincident_points, find_duplicate_points};
pub use compaction::VertexCompaction;
pub use error::{WeldError, WeldResult};
pub use merge::{MergeOutcome, MergeParams, MergeReport, WeldCheck, merge_meshes, mirror_and_merge};
pub use spatial::PointIndex;
