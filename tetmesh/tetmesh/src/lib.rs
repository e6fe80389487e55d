//! Mirror-and-merge toolkit for tetrahedral finite-element meshes.
//!
//! This umbrella crate re-exports the `tetmesh-*` crates. A typical use is
//! growing a meshed representative volume into a larger, symmetric one:
//! reflect it across a bounding face, weld the coincident face vertices and
//! repeat per axis.
//!
//! # Quick Start
//!
//! ```no_run
//! use tetmesh::prelude::*;
//!
//! let rve = load_mesh("rve.mesh").unwrap();
//!
//! // Check the input before mirroring it
//! let report = validate_mesh(&rve).unwrap();
//! assert!(report.is_valid());
//!
//! // Reflect across x = 0 and weld the shared face
//! let params = MergeParams::on_plane(Axis::X, 0.0).with_tolerance(1e-5);
//! let merged = mirror_and_merge(&rve, &params).unwrap();
//! println!("{}", merged.report);
//!
//! save_mesh(&merged.mesh, "rve_x2.vtk").unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - `TetMesh`, `Tetrahedron`, `Aabb`, `Axis`
//! - [`transform`] - Reflection, scaling, translation, box snapping
//! - [`weld`] - Coincident-point search, vertex compaction, mirror-merge
//! - [`repair`] - Orientation checks, validation reports, subtractive repair
//! - [`io`] - Medit `.mesh` and legacy VTK files
//! - [`pipeline`] - TOML-configured step chains and multi-scale presets
//!
//! # Feature Flags
//!
//! - `serde` - Serialize the core types and parameter structs

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `TetMesh`, `Tetrahedron`, `Aabb`, `Axis`.
pub use tetmesh_types as types;

/// Reflection, scaling, translation and box snapping.
pub use tetmesh_transform as transform;

/// Coincident-point welding and mirror-merge.
pub use tetmesh_weld as weld;

/// Orientation checks, validation and repair.
pub use tetmesh_repair as repair;

/// Medit and VTK file I/O.
pub use tetmesh_io as io;

/// Configurable step chains and multi-scale presets.
pub use tetmesh_pipeline as pipeline;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mirror-and-merge work.
pub mod prelude {
    // Core types
    pub use tetmesh_types::{Aabb, Axis, MeshBounds, MeshTopology, Point3, TetMesh, Vector3};

    // I/O
    pub use tetmesh_io::{MeshFormat, load_mesh, save_mesh};

    // Transform
    pub use tetmesh_transform::{MirrorPlane, Transform3D, reflect, translate_to_origin};

    // Weld
    pub use tetmesh_weld::{MergeParams, MergeReport, WeldCheck, merge_meshes, mirror_and_merge};

    // Repair
    pub use tetmesh_repair::{MeshReport, check_orientation, repair_mesh, validate_mesh};

    // Pipeline
    pub use tetmesh_pipeline::{Pipeline, PipelineConfig, Step};
}

// =============================================================================
// Tests
// =============================================================================
