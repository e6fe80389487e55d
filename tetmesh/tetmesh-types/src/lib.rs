//! Core tetrahedral mesh types for tetmesh.
//!
//! This crate provides the foundational types for volumetric mesh processing:
//!
//! - [`TetMesh`] - A tetrahedral mesh with indexed vertices and optional region tags
//! - [`Tetrahedron`] - A concrete tetrahedron with resolved vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`Axis`] - Coordinate axis selector used by mirror planes
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Orientation
//!
//! An element `[a, b, c, d]` is positively oriented when the scalar triple
//! product `(b - a) x (c - a) . (d - a)` is positive. Every transform in the
//! tetmesh crates preserves positive orientation.
//!
//! # Example
//!
//! ```
//! use tetmesh_types::{TetMesh, Point3, MeshTopology};
//!
//! let mut mesh = TetMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 0.0, 1.0));
//! mesh.tetrahedra.push([0, 1, 2, 3]);
//!
//! assert_eq!(mesh.element_count(), 1);
//! assert!((mesh.signed_volume() - 1.0 / 6.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod axis;
mod bounds;
mod error;
mod mesh;
mod tetrahedron;
mod traits;

pub use axis::Axis;
pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use mesh::{TetMesh, block_mesh, unit_cube};
pub use tetrahedron::Tetrahedron;
pub use traits::{MeshBounds, MeshTopology};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
