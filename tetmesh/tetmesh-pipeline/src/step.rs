//! Pipeline steps and their TOML representation.
//!
//! Steps are internally tagged by `op`:
//!
//! ```toml
//! [[steps]]
//! op = "mirror"
//! axis = "x"
//! plane = "min"
//!
//! [[steps]]
//! op = "translate_to_origin"
//!
//! [[steps]]
//! op = "scale"
//! factor = 0.5
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tetmesh_types::{Axis, MeshBounds, TetMesh};

/// Where a mirror plane sits along its axis.
///
/// `Min` and `Max` are resolved against the mesh as it is when the step
/// runs, so a chain of mirrors follows the growing mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanePolicy {
    /// Minimum bounding-box coordinate along the axis.
    #[default]
    Min,
    /// Maximum bounding-box coordinate along the axis.
    Max,
    /// A fixed coordinate.
    Value(f64),
}

impl PlanePolicy {
    /// Plane coordinate along `axis` for `mesh`.
    ///
    /// Returns `None` when the policy depends on bounds and the mesh has no
    /// vertices.
    #[must_use]
    pub fn resolve(self, mesh: &TetMesh, axis: Axis) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Min => mesh.bounds_opt().map(|b| b.min_along(axis)),
            Self::Max => mesh.bounds_opt().map(|b| b.max_along(axis)),
        }
    }
}

impl fmt::Display for PlanePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for PlanePolicy {
    type Err = String;

    /// Parses `min`, `max` or a coordinate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => other
                .parse()
                .map(Self::Value)
                .map_err(|_| format!("invalid plane '{s}': expected min, max or a number")),
        }
    }
}

/// One operation in a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Mirror the mesh and merge it with its reflection.
    Mirror {
        /// Axis normal to the mirror plane.
        axis: Axis,
        /// Plane position (default: `min`).
        #[serde(default)]
        plane: PlanePolicy,
    },
    /// Move the bounding-box minimum to the origin.
    TranslateToOrigin,
    /// Move every vertex by a fixed offset.
    Translate {
        /// Offset `[dx, dy, dz]`.
        offset: [f64; 3],
    },
    /// Scale uniformly about the origin.
    Scale {
        /// Non-zero scale factor.
        factor: f64,
    },
    /// Clamp coordinates within `tolerance` of a box face onto the face.
    SnapToBox {
        /// Box minimum corner.
        min: [f64; 3],
        /// Box maximum corner.
        max: [f64; 3],
        /// Snap distance.
        tolerance: f64,
    },
    /// Drop inverted and degenerate elements and unused vertices.
    Repair,
    /// Record a copy of the current mesh under `name`.
    Checkpoint {
        /// Checkpoint name.
        name: String,
    },
}

impl Step {
    /// Mirror across the plane at the mesh minimum along `axis`.
    #[must_use]
    pub const fn mirror(axis: Axis) -> Self {
        Self::Mirror {
            axis,
            plane: PlanePolicy::Min,
        }
    }

    /// Record a checkpoint.
    #[must_use]
    pub fn checkpoint(name: impl Into<String>) -> Self {
        Self::Checkpoint { name: name.into() }
    }

    /// Short operation name, as used in TOML.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mirror { .. } => "mirror",
            Self::TranslateToOrigin => "translate_to_origin",
            Self::Translate { .. } => "translate",
            Self::Scale { .. } => "scale",
            Self::SnapToBox { .. } => "snap_to_box",
            Self::Repair => "repair",
            Self::Checkpoint { .. } => "checkpoint",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mirror { axis, plane } => write!(f, "mirror {axis} at {plane}"),
            Self::Translate { offset: [x, y, z] } => write!(f, "translate by ({x}, {y}, {z})"),
            Self::Scale { factor } => write!(f, "scale by {factor}"),
            Self::SnapToBox { tolerance, .. } => write!(f, "snap to box (tolerance {tolerance})"),
            Self::Checkpoint { name } => write!(f, "checkpoint `{name}`"),
            Self::TranslateToOrigin | Self::Repair => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetmesh_types::unit_cube;

    #[test]
    fn plane_policy_resolution() {
        let mut cube = unit_cube();
        cube.translate_in_place([2.0, 0.0, -1.0].into());

        assert_eq!(PlanePolicy::Min.resolve(&cube, Axis::X), Some(2.0));
        assert_eq!(PlanePolicy::Max.resolve(&cube, Axis::Z), Some(0.0));
        assert_eq!(PlanePolicy::Value(7.5).resolve(&cube, Axis::Y), Some(7.5));
        assert_eq!(PlanePolicy::Min.resolve(&TetMesh::new(), Axis::X), None);
        assert_eq!(PlanePolicy::Value(1.0).resolve(&TetMesh::new(), Axis::X), Some(1.0));
    }

    #[test]
    fn plane_policy_parse() {
        assert_eq!("MIN".parse::<PlanePolicy>(), Ok(PlanePolicy::Min));
        assert_eq!("max".parse::<PlanePolicy>(), Ok(PlanePolicy::Max));
        assert_eq!("-0.25".parse::<PlanePolicy>(), Ok(PlanePolicy::Value(-0.25)));
        assert!("middle".parse::<PlanePolicy>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Step::mirror(Axis::Y).to_string(), "mirror y at min");
        assert_eq!(Step::Scale { factor: 0.5 }.to_string(), "scale by 0.5");
        assert_eq!(Step::TranslateToOrigin.to_string(), "translate_to_origin");
    }
}
