//! Coordinate axis selector.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three coordinate axes.
///
/// # Example
///
/// ```
/// use tetmesh_types::{Axis, Point3};
///
/// let axis: Axis = "y".parse().unwrap();
/// assert_eq!(axis, Axis::Y);
/// assert_eq!(axis.index(), 1);
/// assert_eq!(axis.coord(&Point3::new(1.0, 2.0, 3.0)), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// The X axis (index 0).
    X,
    /// The Y axis (index 1).
    Y,
    /// The Z axis (index 2).
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis (`0`, `1` or `2`).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis for a component index, `None` for anything above 2.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Coordinate of `point` along this axis.
    #[inline]
    #[must_use]
    pub fn coord(self, point: &Point3<f64>) -> f64 {
        point[self.index()]
    }

    /// Unit vector along this axis.
    #[inline]
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        let mut v = Vector3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an [`Axis`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAxisError(String);

impl fmt::Display for ParseAxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid axis '{}': expected x, y, z, 0, 1 or 2", self.0)
    }
}

impl std::error::Error for ParseAxisError {}

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Self::X),
            "y" | "1" => Ok(Self::Y),
            "z" | "2" => Ok(Self::Z),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), Some(axis));
        }
        assert_eq!(Axis::from_index(3), None);
    }

    #[test]
    fn parse_names_and_indices() {
        assert_eq!("X".parse::<Axis>(), Ok(Axis::X));
        assert_eq!("1".parse::<Axis>(), Ok(Axis::Y));
        assert_eq!(" z ".parse::<Axis>(), Ok(Axis::Z));
        assert!("w".parse::<Axis>().is_err());
    }

    #[test]
    fn unit_vector() {
        assert_eq!(Axis::Z.unit(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
