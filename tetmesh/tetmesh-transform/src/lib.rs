//! Geometric transforms for tetrahedral meshes.
//!
//! This crate provides tools for:
//! - Reflection across axis-aligned mirror planes with winding correction
//! - Uniform scaling, translation and translate-to-origin
//! - Snapping near-boundary coordinates onto a bounding box
//! - Composable 4x4 transforms that keep element orientation positive
//!
//! Every operation takes a mesh by reference and returns a new mesh.
//!
//! # Example
//!
//! ```
//! use tetmesh_transform::{MirrorPlane, reflect, translate_to_origin};
//! use tetmesh_types::{unit_cube, Axis, MeshBounds};
//!
//! let cube = unit_cube();
//! let mirrored = reflect(&cube, MirrorPlane::new(Axis::X, 0.0));
//! assert!((mirrored.signed_volume() - 1.0).abs() < 1e-12);
//! assert_eq!(mirrored.bounds().min.x, -1.0);
//!
//! let moved = translate_to_origin(&mirrored);
//! assert_eq!(moved.bounds().min.x, 0.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod ops;
mod plane;
mod transform;

pub use error::{TransformError, TransformResult};
pub use ops::{reflect, scale, snap_to_box, translate, translate_to_origin};
pub use plane::MirrorPlane;
pub use transform::Transform3D;
