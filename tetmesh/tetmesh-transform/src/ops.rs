//! Whole-mesh transform operations.
//!
//! Each function takes a mesh by reference and returns a new mesh; inputs
//! are never modified.

use nalgebra::Vector3;
use tetmesh_types::{Aabb, Axis, MeshBounds, TetMesh};
use tracing::debug;

use crate::{MirrorPlane, TransformError, TransformResult};

/// Reflect a mesh across an axis-aligned plane.
///
/// Every vertex is mirrored with [`MirrorPlane::reflect_point`] and every
/// element `[a, b, c, d]` is rewound to `[a, c, b, d]`, so a positively
/// oriented input stays positively oriented. Vertex order, element order and region tags are
/// otherwise unchanged; no deduplication takes place.
///
/// # Example
///
/// ```
/// use tetmesh_transform::{reflect, MirrorPlane};
/// use tetmesh_types::{unit_cube, Axis, MeshTopology};
///
/// let cube = unit_cube();
/// let mirrored = reflect(&cube, MirrorPlane::new(Axis::Y, 1.0));
///
/// assert_eq!(mirrored.vertex_count(), cube.vertex_count());
/// assert!(mirrored.element_volumes().iter().all(|&v| v > 0.0));
/// ```
#[must_use]
pub fn reflect(mesh: &TetMesh, plane: MirrorPlane) -> TetMesh {
    let vertices = mesh.vertices.iter().map(|v| plane.reflect_point(v)).collect();
    let tetrahedra = mesh
        .tetrahedra
        .iter()
        .map(|&[a, b, c, d]| [a, c, b, d])
        .collect();

    debug!(
        axis = %plane.axis,
        offset = plane.offset,
        vertices = mesh.vertices.len(),
        elements = mesh.tetrahedra.len(),
        "reflected mesh"
    );

    TetMesh {
        vertices,
        tetrahedra,
        regions: mesh.regions.clone(),
    }
}

/// Scale a mesh uniformly about the origin.
///
/// Positive factors keep orientation. A negative factor is a point
/// reflection through the origin, so element winding is reversed to keep
/// volumes positive.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScale`] if `factor` is zero or not
/// finite.
pub fn scale(mesh: &TetMesh, factor: f64) -> TransformResult<TetMesh> {
    if !factor.is_finite() || factor == 0.0 {
        return Err(TransformError::InvalidScale { factor });
    }

    let mut result = mesh.clone();
    result.scale_in_place(factor);
    if factor < 0.0 {
        result.reverse_winding();
    }

    debug!(factor, vertices = result.vertices.len(), "scaled mesh");
    Ok(result)
}

/// Translate every vertex of a mesh by `offset`.
#[must_use]
pub fn translate(mesh: &TetMesh, offset: Vector3<f64>) -> TetMesh {
    let mut result = mesh.clone();
    result.translate_in_place(offset);
    debug!(dx = offset.x, dy = offset.y, dz = offset.z, "translated mesh");
    result
}

/// Translate a mesh so that its bounding-box minimum sits at the origin.
///
/// An empty mesh is returned unchanged.
///
/// # Example
///
/// ```
/// use tetmesh_transform::translate_to_origin;
/// use tetmesh_types::{unit_cube, MeshBounds, Point3, Vector3};
///
/// let mut cube = unit_cube();
/// cube.translate_in_place(Vector3::new(-3.0, 2.0, 0.5));
///
/// let moved = translate_to_origin(&cube);
/// assert_eq!(moved.bounds().min, Point3::origin());
/// ```
#[must_use]
pub fn translate_to_origin(mesh: &TetMesh) -> TetMesh {
    match mesh.bounds_opt() {
        Some(bounds) => translate(mesh, -bounds.min.coords),
        None => mesh.clone(),
    }
}

/// Snap near-boundary coordinates exactly onto the faces of `bounds`.
///
/// For each vertex and each axis, a coordinate within `tolerance` of the
/// box minimum along that axis is replaced by the minimum, and the result is
/// then replaced by the maximum if it lies within `tolerance` of it. The
/// maximum therefore wins only on a box no thicker than `tolerance`. Mesh generators working from voxel data leave boundary vertices
/// slightly off the box faces; snapping makes the mirror-plane vertices
/// exactly coplanar before welding.
///
/// # Errors
///
/// - [`TransformError::InvalidTolerance`] if `tolerance` is negative or not finite
/// - [`TransformError::EmptyMesh`] if `bounds` is empty
pub fn snap_to_box(mesh: &TetMesh, bounds: &Aabb, tolerance: f64) -> TransformResult<TetMesh> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(TransformError::InvalidTolerance { tolerance });
    }
    if bounds.is_empty() {
        return Err(TransformError::EmptyMesh);
    }

    let mut result = mesh.clone();
    let mut snapped = 0_usize;
    for vertex in &mut result.vertices {
        for axis in Axis::ALL {
            let i = axis.index();
            let lo = bounds.min_along(axis);
            let hi = bounds.max_along(axis);
            let value = vertex[i];
            let mut target = value;
            if (target - lo).abs() <= tolerance {
                target = lo;
            }
            if (target - hi).abs() <= tolerance {
                target = hi;
            }
            if value != target {
                vertex[i] = target;
                snapped += 1;
            }
        }
    }

    debug!(snapped, tolerance, "snapped coordinates to bounding box");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use tetmesh_types::{MeshTopology, block_mesh, unit_cube};

    // =========================================================================
    // Reflection
    // =========================================================================

    #[test]
    fn reflect_cube_across_min_face() {
        let cube = unit_cube();
        let mirrored = reflect(&cube, MirrorPlane::new(Axis::X, 0.0));

        let bounds = mirrored.bounds();
        assert_relative_eq!(bounds.min, Point3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(bounds.max, Point3::new(0.0, 1.0, 1.0));
        assert_eq!(mirrored.element_count(), cube.element_count());
        assert_relative_eq!(mirrored.signed_volume(), cube.signed_volume(), epsilon = 1e-12);
    }

    #[test]
    fn reflect_rewinds_each_element() {
        let cube = unit_cube();
        let mirrored = reflect(&cube, MirrorPlane::new(Axis::Z, 1.0));
        for (&[a, b, c, d], refl) in cube.tetrahedra.iter().zip(&mirrored.tetrahedra) {
            assert_eq!(*refl, [a, c, b, d]);
        }
        for (before, after) in cube.element_volumes().iter().zip(mirrored.element_volumes()) {
            assert!(after > 0.0);
            assert_relative_eq!(*before, after, epsilon = 1e-12);
        }
    }

    #[test]
    fn reflect_preserves_regions() {
        let cube = unit_cube().with_regions(vec![1, 2, 3, 4, 5, 6]);
        let mirrored = reflect(&cube, MirrorPlane::new(Axis::Y, 0.0));
        assert_eq!(mirrored.regions, cube.regions);
    }

    #[test]
    fn reflect_twice_is_identity() {
        let block = block_mesh([2, 3, 1], Vector3::new(1.0, 1.5, 0.4));
        let plane = MirrorPlane::new(Axis::Y, 1.5);
        let back = reflect(&reflect(&block, plane), plane);
        assert_eq!(back.tetrahedra, block.tetrahedra);
        for (a, b) in back.vertices.iter().zip(&block.vertices) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    // =========================================================================
    // Scale / translate
    // =========================================================================

    #[test]
    fn scale_rejects_bad_factors() {
        let cube = unit_cube();
        assert!(matches!(
            scale(&cube, 0.0),
            Err(TransformError::InvalidScale { .. })
        ));
        assert!(scale(&cube, f64::NAN).is_err());
        assert!(scale(&cube, f64::INFINITY).is_err());
    }

    #[test]
    fn negative_scale_keeps_orientation() {
        let scaled = scale(&unit_cube(), -2.0).unwrap();
        assert!(scaled.element_volumes().iter().all(|&v| v > 0.0));
        assert_relative_eq!(scaled.signed_volume(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn translate_to_origin_empty_mesh() {
        let empty = TetMesh::new();
        assert_eq!(translate_to_origin(&empty), empty);
    }

    #[test]
    fn reflect_scale_translate_restores_extent() {
        let cube = unit_cube();
        let mirrored = reflect(&cube, MirrorPlane::new(Axis::X, 0.0));
        let scaled = scale(&mirrored, 0.5).unwrap();
        let moved = translate_to_origin(&scaled);

        let bounds = moved.bounds();
        assert_relative_eq!(bounds.min, Point3::origin());
        assert_relative_eq!(bounds.max, Point3::new(0.5, 0.5, 0.5));
    }

    // =========================================================================
    // Snap to box
    // =========================================================================

    #[test]
    fn snap_moves_near_boundary_coordinates() {
        let mut cube = unit_cube();
        cube.vertices[1].x = 1.004;
        cube.vertices[4].z = 0.997;
        cube.vertices[6] = Point3::new(0.98, 1.0, 1.0);

        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let snapped = snap_to_box(&cube, &bounds, 0.005).unwrap();

        assert_eq!(snapped.vertices[1].x, 1.0);
        assert_eq!(snapped.vertices[4].z, 1.0);
        // Outside tolerance, left alone.
        assert_eq!(snapped.vertices[6].x, 0.98);
    }

    #[test]
    fn snap_applies_minimum_then_maximum() {
        let mut cube = unit_cube();
        cube.vertices[1].x = 0.07;
        cube.vertices[2].x = 0.12;
        cube.vertices[3].y = 0.005;

        // Thicker than the tolerance along x: each face keeps its own side.
        // Thinner along y: the minimum snap lands within reach of the maximum.
        let bounds = Aabb::new(Point3::origin(), Point3::new(0.15, 0.01, 1.0));
        let snapped = snap_to_box(&cube, &bounds, 0.1).unwrap();

        assert_eq!(snapped.vertices[1].x, 0.0);
        assert_eq!(snapped.vertices[2].x, 0.15);
        assert_eq!(snapped.vertices[3].y, 0.01);
        assert_eq!(snapped.vertices[0].y, 0.01);
    }

    #[test]
    fn snap_rejects_bad_input() {
        let cube = unit_cube();
        let bounds = cube.bounds();
        assert!(matches!(
            snap_to_box(&cube, &bounds, -1.0),
            Err(TransformError::InvalidTolerance { .. })
        ));
        assert!(matches!(
            snap_to_box(&cube, &Aabb::empty(), 0.1),
            Err(TransformError::EmptyMesh)
        ));
    }
}
