//! Auxiliary per-cell and per-point data attached to a mesh on output.

/// Where a field's values live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLocation {
    /// One value per element.
    Cell,
    /// One value per vertex.
    Point,
}

/// Field values, scalar or 3-vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// One number per entry.
    Scalar(Vec<f64>),
    /// Three components per entry.
    Vector(Vec<[f64; 3]>),
}

impl FieldValues {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(v) => v.len(),
            Self::Vector(v) => v.len(),
        }
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named data array written next to the mesh.
///
/// # Example
///
/// ```
/// use tetmesh_io::{FieldData, FieldLocation};
///
/// let stress = FieldData::cell_scalar("von_mises", vec![1.0, 2.5]);
/// assert_eq!(stress.location, FieldLocation::Cell);
/// assert_eq!(stress.values.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Array name; whitespace is replaced with `_` on output.
    pub name: String,
    /// Cell or point data.
    pub location: FieldLocation,
    /// The values.
    pub values: FieldValues,
}

impl FieldData {
    /// A scalar value per element.
    #[must_use]
    pub fn cell_scalar(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            location: FieldLocation::Cell,
            values: FieldValues::Scalar(values),
        }
    }

    /// A 3-vector per element.
    #[must_use]
    pub fn cell_vector(name: impl Into<String>, values: Vec<[f64; 3]>) -> Self {
        Self {
            name: name.into(),
            location: FieldLocation::Cell,
            values: FieldValues::Vector(values),
        }
    }

    /// A scalar value per vertex.
    #[must_use]
    pub fn point_scalar(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            location: FieldLocation::Point,
            values: FieldValues::Scalar(values),
        }
    }

    /// A 3-vector per vertex.
    #[must_use]
    pub fn point_vector(name: impl Into<String>, values: Vec<[f64; 3]>) -> Self {
        Self {
            name: name.into(),
            location: FieldLocation::Point,
            values: FieldValues::Vector(values),
        }
    }
}
