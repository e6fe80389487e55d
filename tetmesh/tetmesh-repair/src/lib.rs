//! Validity diagnostics and subtractive repair for tetrahedral meshes.
//!
//! This crate provides tools for:
//! - Orientation checks (inverted and zero-volume elements)
//! - Unreferenced vertex detection and removal
//! - Coincident vertex detection as a post-merge sanity check
//! - Mesh health reports
//! - Removal of defective elements
//!
//! Diagnostics never modify their input. Repair is explicit and subtractive:
//! flagged elements are dropped, nothing is regenerated in their place.
//!
//! # Example
//!
//! ```
//! use tetmesh_repair::{validate_mesh, repair_mesh, RepairParams};
//! use tetmesh_types::unit_cube;
//!
//! let mut mesh = unit_cube();
//! mesh.tetrahedra[5].swap(1, 2);
//!
//! let report = validate_mesh(&mesh).unwrap();
//! assert_eq!(report.inverted_count, 1);
//!
//! let (repaired, summary) = repair_mesh(&mesh, &RepairParams::default()).unwrap();
//! assert_eq!(summary.final_elements, 5);
//! assert!(validate_mesh(&repaired).unwrap().is_valid());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod orientation;
mod repair;
mod validate;

pub use error::{RepairError, RepairResult};
pub use orientation::{OrientationReport, check_orientation, recommended_volume_tolerance};
pub use repair::{
    RepairParams, RepairSummary, find_unreferenced_vertices, remove_invalid_elements,
    remove_unreferenced_vertices, repair_mesh,
};
pub use validate::{MeshReport, ValidationOptions, validate_mesh, validate_mesh_with_options};
