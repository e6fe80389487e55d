//! Mesh validation and health reporting.
//!
//! Checks meshes for the defects that break finite-element assembly and for
//! the storage issues that are merely wasteful.

use tetmesh_types::TetMesh;
use tetmesh_weld::find_duplicate_points;
use tracing::warn;

use crate::error::check_tolerance;
use crate::{RepairResult, check_orientation, find_unreferenced_vertices};

/// Report of mesh validation results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of elements.
    pub element_count: usize,

    /// Vertices referenced by no element.
    pub unreferenced_vertex_count: usize,
    /// Elements with negative signed volume beyond tolerance.
    pub inverted_count: usize,
    /// Elements with near-zero signed volume.
    pub degenerate_count: usize,
    /// Pairs of distinct vertices closer than the duplicate tolerance.
    /// `None` if the duplicate check was skipped.
    pub duplicate_point_pairs: Option<usize>,

    /// Sum of signed element volumes.
    pub total_volume: f64,
    /// Smallest signed element volume (0.0 for an empty mesh).
    pub min_element_volume: f64,
    /// Largest signed element volume (0.0 for an empty mesh).
    pub max_element_volume: f64,
}

impl MeshReport {
    /// Whether the mesh is usable for assembly: no inverted elements, no
    /// degenerate elements and no coincident vertices.
    ///
    /// Unreferenced vertices do not make a mesh invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inverted_count == 0
            && self.degenerate_count == 0
            && self.duplicate_point_pairs.unwrap_or(0) == 0
    }

    /// Whether there are harmless issues worth a warning.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        self.unreferenced_vertex_count > 0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Elements: {}", self.element_count)?;
        writeln!(f, "  Volume: {:.6}", self.total_volume)?;
        writeln!(
            f,
            "  Element volume range: [{:.3e}, {:.3e}]",
            self.min_element_volume, self.max_element_volume
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "  Status: {}",
            if self.is_valid() { "Valid" } else { "Invalid" }
        )?;

        if !self.is_valid() || self.has_warnings() {
            writeln!(f)?;
            writeln!(f, "  Issues:")?;
            if self.inverted_count > 0 {
                writeln!(f, "    Inverted elements: {}", self.inverted_count)?;
            }
            if self.degenerate_count > 0 {
                writeln!(f, "    Zero-volume elements: {}", self.degenerate_count)?;
            }
            if let Some(pairs) = self.duplicate_point_pairs.filter(|&p| p > 0) {
                writeln!(f, "    Duplicate point pairs: {pairs}")?;
            }
            if self.unreferenced_vertex_count > 0 {
                writeln!(
                    f,
                    "    Unreferenced vertices: {}",
                    self.unreferenced_vertex_count
                )?;
            }
        }

        Ok(())
    }
}

/// Options for mesh validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    /// Signed-volume threshold for inverted and degenerate elements.
    pub volume_tolerance: f64,
    /// Distance below which two vertices count as duplicates. `None` skips
    /// the duplicate search.
    pub duplicate_tolerance: Option<f64>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            volume_tolerance: 1e-12,
            duplicate_tolerance: Some(1e-9),
        }
    }
}

impl ValidationOptions {
    /// Sets the volume tolerance.
    #[must_use]
    pub const fn with_volume_tolerance(mut self, tolerance: f64) -> Self {
        self.volume_tolerance = tolerance;
        self
    }

    /// Sets the duplicate-point tolerance, or disables the check with `None`.
    #[must_use]
    pub const fn with_duplicate_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.duplicate_tolerance = tolerance;
        self
    }
}

/// Validate a mesh with default options.
///
/// # Errors
///
/// Returns an error if the mesh has dangling indices.
///
/// # Example
///
/// ```
/// use tetmesh_repair::validate_mesh;
/// use tetmesh_types::unit_cube;
///
/// let report = validate_mesh(&unit_cube()).unwrap();
/// assert!(report.is_valid());
/// assert_eq!(report.element_count, 6);
/// assert!((report.total_volume - 1.0).abs() < 1e-12);
/// ```
pub fn validate_mesh(mesh: &TetMesh) -> RepairResult<MeshReport> {
    validate_mesh_with_options(mesh, &ValidationOptions::default())
}

/// Validate a mesh with custom options.
///
/// Runs the unreferenced-vertex, orientation and duplicate-point checks.
/// The mesh is not modified. Findings are logged at `warn` level.
///
/// # Errors
///
/// - [`RepairError::InvalidTolerance`](crate::RepairError::InvalidTolerance)
///   for a bad volume or duplicate tolerance
/// - [`RepairError::Mesh`](crate::RepairError::Mesh) for dangling indices
pub fn validate_mesh_with_options(
    mesh: &TetMesh,
    options: &ValidationOptions,
) -> RepairResult<MeshReport> {
    let orientation = check_orientation(mesh, options.volume_tolerance)?;
    let unreferenced = find_unreferenced_vertices(mesh);

    let duplicate_point_pairs = match options.duplicate_tolerance {
        Some(tolerance) => {
            check_tolerance(tolerance)?;
            Some(find_duplicate_points(&mesh.vertices, tolerance)?.len())
        }
        None => None,
    };

    let volumes = mesh.element_volumes();
    let (min_element_volume, max_element_volume) = if volumes.is_empty() {
        (0.0, 0.0)
    } else {
        volumes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    };

    let report = MeshReport {
        vertex_count: mesh.vertices.len(),
        element_count: mesh.tetrahedra.len(),
        unreferenced_vertex_count: unreferenced.len(),
        inverted_count: orientation.inverted.len(),
        degenerate_count: orientation.degenerate.len(),
        duplicate_point_pairs,
        total_volume: volumes.iter().sum(),
        min_element_volume,
        max_element_volume,
    };

    if report.unreferenced_vertex_count > 0 {
        warn!(
            count = report.unreferenced_vertex_count,
            "mesh has unreferenced vertices"
        );
    }
    if report.inverted_count > 0 {
        warn!(count = report.inverted_count, "mesh has inverted elements");
    }
    if report.degenerate_count > 0 {
        warn!(count = report.degenerate_count, "mesh has zero-volume elements");
    }
    if let Some(pairs) = report.duplicate_point_pairs.filter(|&p| p > 0) {
        warn!(pairs, "mesh has coincident vertices");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tetmesh_types::{Point3, unit_cube};

    #[test]
    fn empty_mesh_is_valid() {
        let report = validate_mesh(&TetMesh::new()).unwrap();
        assert!(report.is_valid());
        assert_relative_eq!(report.min_element_volume, 0.0);
    }

    #[test]
    fn reports_every_defect() {
        let mut mesh = unit_cube();
        mesh.tetrahedra[1].swap(1, 2);
        mesh.vertices.push(Point3::new(5.0, 5.0, 5.0)); // unreferenced
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // duplicate of 0

        let report = validate_mesh(&mesh).unwrap();
        assert_eq!(report.inverted_count, 1);
        assert_eq!(report.unreferenced_vertex_count, 2);
        assert_eq!(report.duplicate_point_pairs, Some(1));
        assert!(!report.is_valid());
        assert!(report.has_warnings());
        assert_relative_eq!(report.total_volume, 4.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(report.min_element_volume, -1.0 / 6.0, epsilon = 1e-12);

        let text = report.to_string();
        assert!(text.contains("Invalid"));
        assert!(text.contains("Inverted elements: 1"));
        assert!(text.contains("Duplicate point pairs: 1"));
    }

    #[test]
    fn unreferenced_alone_is_valid() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Point3::new(3.0, 0.0, 0.0));
        let report = validate_mesh(&mesh).unwrap();
        assert!(report.is_valid());
        assert!(report.has_warnings());
    }

    #[test]
    fn skip_duplicate_check() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Point3::new(1.0, 1.0, 1.0));
        let options = ValidationOptions::default().with_duplicate_tolerance(None);
        let report = validate_mesh_with_options(&mesh, &options).unwrap();
        assert_eq!(report.duplicate_point_pairs, None);
        assert!(report.is_valid());
    }

    #[test]
    fn bad_duplicate_tolerance() {
        let options = ValidationOptions::default().with_duplicate_tolerance(Some(-1.0));
        assert!(validate_mesh_with_options(&unit_cube(), &options).is_err());
    }
}
