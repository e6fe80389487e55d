//! A single element resolved to corner positions.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Four corner positions, in winding order.
///
/// Quality and orientation checks work on this rather than on index tuples.
///
/// # Example
///
/// ```
/// use tetmesh_types::{Tetrahedron, Point3};
///
/// let tet = Tetrahedron::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// );
///
/// assert!((tet.signed_volume() - 1.0 / 6.0).abs() < 1e-12);
/// assert!((tet.reversed().signed_volume() + 1.0 / 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tetrahedron {
    /// First vertex (apex of the edge vectors).
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
    /// Fourth vertex.
    pub v3: Point3<f64>,
}

impl Tetrahedron {
    /// Corners in winding order.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>, v3: Point3<f64>) -> Self {
        Self { v0, v1, v2, v3 }
    }

    /// The three edge vectors emanating from `v0`.
    #[inline]
    #[must_use]
    pub fn edges_from_v0(&self) -> [Vector3<f64>; 3] {
        [self.v1 - self.v0, self.v2 - self.v0, self.v3 - self.v0]
    }

    /// Signed volume from the scalar triple product of the edges from `v0`.
    ///
    /// Positive for positively oriented elements, negative for inverted ones
    /// and zero for collapsed (coplanar) ones.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let [e1, e2, e3] = self.edges_from_v0();
        e1.cross(&e2).dot(&e3) / 6.0
    }

    /// Unsigned volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Centroid (average of the four vertices).
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords + self.v3.coords) * 0.25)
    }

    /// The same tetrahedron with opposite orientation.
    ///
    /// `v1` and `v2` trade places, which flips the sign of the signed volume.
    #[inline]
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            v0: self.v0,
            v1: self.v2,
            v2: self.v1,
            v3: self.v3,
        }
    }

    /// Length of the longest of the six edges.
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        let pts = [self.v0, self.v1, self.v2, self.v3];
        let mut longest = 0.0_f64;
        for i in 0..4 {
            for j in (i + 1)..4 {
                longest = longest.max((pts[j] - pts[i]).norm());
            }
        }
        longest
    }
}
