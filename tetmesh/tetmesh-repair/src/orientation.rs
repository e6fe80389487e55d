//! Element orientation and degeneracy classification.

use tetmesh_types::TetMesh;
use tracing::debug;

use crate::error::check_tolerance;
use crate::RepairResult;

/// Elements with a defective signed volume.
///
/// Both lists hold element indices in ascending order. An element is in at
/// most one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrientationReport {
    /// Elements with signed volume below `-tolerance`.
    pub inverted: Vec<u32>,
    /// Elements with `|signed volume| <= tolerance`.
    pub degenerate: Vec<u32>,
}

impl OrientationReport {
    /// Whether no element is inverted or degenerate.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.inverted.is_empty() && self.degenerate.is_empty()
    }

    /// Total number of defective elements.
    #[must_use]
    pub fn defect_count(&self) -> usize {
        self.inverted.len() + self.degenerate.len()
    }

    /// Union of both defect lists, sorted ascending.
    #[must_use]
    pub fn defective(&self) -> Vec<u32> {
        let mut all: Vec<u32> = self
            .inverted
            .iter()
            .chain(&self.degenerate)
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

/// Volume tolerance for a mesh with the given maximum element size.
///
/// One thousandth of the volume of a cube with edge `max_element_size`.
///
/// ```
/// use tetmesh_repair::recommended_volume_tolerance;
///
/// assert!((recommended_volume_tolerance(0.1) - 1e-6).abs() < 1e-18);
/// ```
#[must_use]
pub fn recommended_volume_tolerance(max_element_size: f64) -> f64 {
    0.001 * max_element_size.powi(3)
}

/// Classify every element by its signed volume.
///
/// Signed volume is the scalar triple product of the edges from the first
/// vertex, divided by six. Elements below `-volume_tolerance` are inverted;
/// elements with magnitude within `volume_tolerance` of zero are
/// degenerate.
///
/// # Errors
///
/// - [`RepairError::InvalidTolerance`](crate::RepairError::InvalidTolerance)
///   if `volume_tolerance` is negative or not finite
/// - [`RepairError::Mesh`](crate::RepairError::Mesh) if an element has a
///   dangling index
///
/// # Example
///
/// ```
/// use tetmesh_repair::check_orientation;
/// use tetmesh_types::unit_cube;
///
/// let mut cube = unit_cube();
/// cube.tetrahedra[2].swap(0, 1);
///
/// let report = check_orientation(&cube, 1e-12).unwrap();
/// assert_eq!(report.inverted, vec![2]);
/// assert!(report.degenerate.is_empty());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn check_orientation(mesh: &TetMesh, volume_tolerance: f64) -> RepairResult<OrientationReport> {
    check_tolerance(volume_tolerance)?;
    mesh.validate()?;

    let mut report = OrientationReport::default();
    for (i, volume) in mesh.element_volumes().into_iter().enumerate() {
        if volume.abs() <= volume_tolerance {
            report.degenerate.push(i as u32);
        } else if volume < -volume_tolerance {
            report.inverted.push(i as u32);
        }
    }

    debug!(
        elements = mesh.tetrahedra.len(),
        inverted = report.inverted.len(),
        degenerate = report.degenerate.len(),
        volume_tolerance,
        "orientation check"
    );
    Ok(report)
}
