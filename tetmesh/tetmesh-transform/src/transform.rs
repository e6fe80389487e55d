//! Composable affine transforms for tetrahedral meshes.

use nalgebra::{Matrix4, Point3, Vector3};
use tetmesh_types::TetMesh;

use crate::MirrorPlane;

/// Affine map in homogeneous coordinates.
///
/// Built from translations, scalings and mirror planes, chained with
/// [`then`](Self::then).
/// [`apply_to_mesh`](Self::apply_to_mesh) reverses element winding whenever
/// the linear part has a negative determinant, so orientation-reversing
/// transforms still produce positively oriented elements.
///
/// # Example
///
/// ```
/// use tetmesh_transform::{MirrorPlane, Transform3D};
/// use tetmesh_types::{unit_cube, Axis};
///
/// let t = Transform3D::reflection(MirrorPlane::new(Axis::X, 0.0))
///     .then(&Transform3D::uniform_scale(0.5));
/// assert!(t.is_orientation_reversing());
///
/// let mesh = t.apply_to_mesh(&unit_cube());
/// assert!((mesh.signed_volume() - 0.125).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Wrap a homogeneous matrix as-is.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Leaves every point where it is.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Shift by `(tx, ty, tz)`.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::from_translation(Vector3::new(tx, ty, tz))
    }

    /// Shift by `v`.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&v),
        }
    }

    /// Same factor on all three axes, origin fixed.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self::scale(factor, factor, factor)
    }

    /// Per-axis factors, origin fixed.
    #[must_use]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// Mirror across `plane`: the axis coordinate maps to `2 * offset - x`.
    #[must_use]
    pub fn reflection(plane: MirrorPlane) -> Self {
        let i = plane.axis.index();
        let mut matrix = Matrix4::identity();
        matrix[(i, i)] = -1.0;
        matrix[(i, 3)] = 2.0 * plane.offset;
        Self { matrix }
    }

    /// Homogeneous matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Chain: the result maps `p` to `other(self(p))`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Undo the map, or `None` for a degenerate (zero-scale) one.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|m| Self { matrix: m })
    }

    /// Determinant of the linear (upper-left 3x3) part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant()
    }

    /// Whether the transform flips handedness (negative determinant).
    #[must_use]
    pub fn is_orientation_reversing(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Map a single point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Map every vertex of `mesh` into a fresh copy.
    ///
    /// Elements are rewound when the map flips handedness. Region tags are
    /// untouched.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &TetMesh) -> TetMesh {
        let mut result = mesh.clone();
        for vertex in &mut result.vertices {
            *vertex = self.transform_point(vertex);
        }
        if self.is_orientation_reversing() {
            result.reverse_winding();
        }
        result
    }
}
