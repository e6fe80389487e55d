//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Axis;

/// An axis-aligned bounding box.
///
/// Mirror planes are normally placed on a face of the box, hence the
/// per-axis accessors.
///
/// # Example
///
/// ```
/// use tetmesh_types::{Aabb, Axis, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 20.0, 30.0));
///
/// assert_eq!(aabb.max_along(Axis::Y), 20.0);
/// assert_eq!(aabb.volume(), 6000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Componentwise minimum.
    pub min: Point3<f64>,
    /// Componentwise maximum.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Box spanned by two opposite corners, in either order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// The empty box: `min` at `+inf`, `max` at `-inf`.
    ///
    /// Growing it with [`Aabb::expand_to_include`] yields the bounds of the
    /// added points.
    ///
    /// ```
    /// use tetmesh_types::{Aabb, Point3};
    ///
    /// let mut aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    ///
    /// aabb.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
    /// assert!(!aabb.is_empty());
    /// assert_eq!(aabb.volume(), 0.0);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::from(Vector3::repeat(f64::INFINITY)),
            max: Point3::from(Vector3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// Bounds of a point set; empty for no points.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |mut aabb, p| {
            aabb.expand_to_include(p);
            aabb
        })
    }

    /// Grow the box to cover `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Whether `min > max` along any axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Axis::ALL
            .iter()
            .any(|&axis| self.min_along(axis) > self.max_along(axis))
    }

    /// Edge lengths.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Midpoint of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Enclosed volume, 0 for an empty box.
    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.size().product()
        }
    }

    /// Longest edge length.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.size().max()
    }

    /// Minimum coordinate along `axis`.
    #[inline]
    #[must_use]
    pub fn min_along(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Maximum coordinate along `axis`.
    #[inline]
    #[must_use]
    pub fn max_along(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
