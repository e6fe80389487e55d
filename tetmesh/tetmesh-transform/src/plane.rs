//! Axis-aligned mirror planes.

use nalgebra::Point3;
use tetmesh_types::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned plane `coord(axis) = offset`.
///
/// Reflection negates the selected coordinate and shifts it by
/// `2 * offset`, leaving the other two coordinates unchanged.
///
/// # Example
///
/// ```
/// use tetmesh_transform::MirrorPlane;
/// use tetmesh_types::{Axis, Point3};
///
/// let plane = MirrorPlane::new(Axis::Z, 1.0);
/// let p = plane.reflect_point(&Point3::new(3.0, 4.0, 0.25));
/// assert_eq!(p, Point3::new(3.0, 4.0, 1.75));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MirrorPlane {
    /// Axis normal to the plane.
    pub axis: Axis,
    /// Signed position of the plane along `axis`.
    pub offset: f64,
}

impl MirrorPlane {
    /// Create a plane normal to `axis` at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(axis: Axis, offset: f64) -> Self {
        Self { axis, offset }
    }

    /// Mirror image of `point` across this plane.
    #[inline]
    #[must_use]
    pub fn reflect_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let mut mirrored = *point;
        let i = self.axis.index();
        mirrored[i] = 2.0f64.mul_add(self.offset, -point[i]);
        mirrored
    }

    /// Signed distance from `point` to the plane along `axis`.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.axis.coord(point) - self.offset
    }

    /// Whether `point` lies on the plane within `tolerance`.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        self.signed_distance(point).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflect_is_involution() {
        let plane = MirrorPlane::new(Axis::Y, -0.75);
        let p = Point3::new(1.0, 2.0, 3.0);
        let back = plane.reflect_point(&plane.reflect_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn points_on_plane_are_fixed() {
        let plane = MirrorPlane::new(Axis::X, 2.5);
        let p = Point3::new(2.5, -1.0, 7.0);
        assert_eq!(plane.reflect_point(&p), p);
        assert!(plane.contains(&p, 0.0));
    }

    #[test]
    fn signed_distance_sign() {
        let plane = MirrorPlane::new(Axis::Z, 1.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(0.0, 0.0, 3.0)), 2.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(0.0, 0.0, 0.5)), -0.5);
        assert!(plane.contains(&Point3::new(0.0, 0.0, 1.05), 0.1));
        assert!(!plane.contains(&Point3::new(0.0, 0.0, 1.2), 0.1));
    }
}
