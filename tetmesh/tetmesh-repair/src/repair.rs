//! Subtractive mesh repair.
//!
//! Repair only removes things: flagged elements and unused vertices. It never
//! fills the gap left by a removed element, so callers should keep an eye on
//! volume and connectivity themselves.

use tetmesh_types::TetMesh;
use tetmesh_weld::VertexCompaction;
use tracing::{info, warn};

use crate::{OrientationReport, RepairResult, check_orientation};

/// Configuration parameters for mesh repair.
///
/// # Example
///
/// ```
/// use tetmesh_repair::RepairParams;
///
/// let params = RepairParams::for_element_size(0.05)
///     .with_remove_unreferenced(false);
/// assert!(!params.remove_unreferenced);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairParams {
    /// Signed-volume threshold for inverted and degenerate elements.
    ///
    /// Default: `1e-12`
    pub volume_tolerance: f64,

    /// Whether to remove vertices left unreferenced after element removal.
    ///
    /// Default: `true`
    pub remove_unreferenced: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            volume_tolerance: 1e-12,
            remove_unreferenced: true,
        }
    }
}

impl RepairParams {
    /// Params scaled to a mesh with the given maximum element size.
    ///
    /// Uses [`recommended_volume_tolerance`](crate::recommended_volume_tolerance).
    #[must_use]
    pub fn for_element_size(max_element_size: f64) -> Self {
        Self {
            volume_tolerance: crate::recommended_volume_tolerance(max_element_size),
            ..Self::default()
        }
    }

    /// Params that only drop exactly flat or inverted elements and keep
    /// every vertex, so vertex indices stay stable.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            volume_tolerance: 0.0,
            remove_unreferenced: false,
        }
    }

    /// Set the volume tolerance.
    #[must_use]
    pub const fn with_volume_tolerance(mut self, tolerance: f64) -> Self {
        self.volume_tolerance = tolerance;
        self
    }

    /// Set whether unreferenced vertices are removed.
    #[must_use]
    pub const fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }
}

/// Result of a repair operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Number of vertices before repair.
    pub initial_vertices: usize,
    /// Number of elements before repair.
    pub initial_elements: usize,
    /// Number of vertices after repair.
    pub final_vertices: usize,
    /// Number of elements after repair.
    pub final_elements: usize,
    /// Number of inverted elements removed.
    pub inverted_removed: usize,
    /// Number of zero-volume elements removed.
    pub degenerate_removed: usize,
    /// Number of unreferenced vertices removed.
    pub unreferenced_removed: usize,
}

impl RepairSummary {
    /// Check if any repairs were performed.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.inverted_removed > 0 || self.degenerate_removed > 0 || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} -> {} vertices, {} -> {} elements ({} inverted, {} zero-volume, {} unreferenced removed)",
            self.initial_vertices,
            self.final_vertices,
            self.initial_elements,
            self.final_elements,
            self.inverted_removed,
            self.degenerate_removed,
            self.unreferenced_removed
        )
    }
}

/// Indices of vertices that appear in no element, ascending.
///
/// Out-of-range element indices are ignored.
///
/// # Example
///
/// ```
/// use tetmesh_repair::find_unreferenced_vertices;
/// use tetmesh_types::{unit_cube, Point3};
///
/// let mut cube = unit_cube();
/// cube.vertices.push(Point3::new(2.0, 2.0, 2.0));
/// assert_eq!(find_unreferenced_vertices(&cube), vec![8]);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn find_unreferenced_vertices(mesh: &TetMesh) -> Vec<u32> {
    let mut referenced = vec![false; mesh.vertices.len()];
    for &index in mesh.tetrahedra.iter().flatten() {
        if let Some(slot) = referenced.get_mut(index as usize) {
            *slot = true;
        }
    }
    referenced
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(i, _)| i as u32)
        .collect()
}

fn retain_unflagged<T: Copy>(items: &[T], flagged: &[bool]) -> Vec<T> {
    items
        .iter()
        .zip(flagged)
        .filter(|&(_, &flag)| !flag)
        .map(|(item, _)| *item)
        .collect()
}

/// Remove the elements flagged in `report`.
///
/// Region tags are filtered alongside so they stay aligned. Vertices are
/// left untouched; follow up with [`remove_unreferenced_vertices`] to drop
/// the ones no longer used.
#[must_use]
pub fn remove_invalid_elements(mesh: &TetMesh, report: &OrientationReport) -> TetMesh {
    let defective = report.defective();
    if defective.is_empty() {
        return mesh.clone();
    }

    let mut remove = vec![false; mesh.tetrahedra.len()];
    for &i in &defective {
        if let Some(slot) = remove.get_mut(i as usize) {
            *slot = true;
        }
    }

    let tetrahedra = retain_unflagged(&mesh.tetrahedra, &remove);
    let regions = mesh
        .regions
        .as_ref()
        .map(|tags| retain_unflagged(tags, &remove));

    warn!(
        removed = defective.len(),
        inverted = report.inverted.len(),
        degenerate = report.degenerate.len(),
        "removed invalid elements"
    );

    TetMesh {
        vertices: mesh.vertices.clone(),
        tetrahedra,
        regions,
    }
}

/// Remove vertices referenced by no element and remap element indices.
///
/// Uses the same offset table as merging: a kept vertex `i` moves to
/// `i - offset(i)`.
///
/// # Errors
///
/// Returns [`RepairError::Mesh`](crate::RepairError::Mesh) if the mesh has dangling indices.
pub fn remove_unreferenced_vertices(mesh: &TetMesh) -> RepairResult<TetMesh> {
    mesh.validate()?;
    let unreferenced = find_unreferenced_vertices(mesh);
    if unreferenced.is_empty() {
        return Ok(mesh.clone());
    }

    let compaction = VertexCompaction::new(mesh.vertices.len(), &unreferenced)?;
    let tetrahedra = mesh
        .tetrahedra
        .iter()
        .map(|tet| tet.map(|i| i - compaction.offset(i)))
        .collect();

    warn!(removed = unreferenced.len(), "removed unreferenced vertices");

    Ok(TetMesh {
        vertices: compaction.filter(&mesh.vertices),
        tetrahedra,
        regions: mesh.regions.clone(),
    })
}

/// Check orientation, drop defective elements and optionally compact the
/// vertex array.
///
/// # Errors
///
/// - [`RepairError::InvalidTolerance`](crate::RepairError::InvalidTolerance) for a bad volume tolerance
/// - [`RepairError::Mesh`](crate::RepairError::Mesh) for dangling indices
///
/// # Example
///
/// ```
/// use tetmesh_repair::{repair_mesh, RepairParams};
/// use tetmesh_types::unit_cube;
///
/// let mut cube = unit_cube();
/// cube.tetrahedra[0].swap(1, 2);
///
/// let (repaired, summary) = repair_mesh(&cube, &RepairParams::default()).unwrap();
/// assert_eq!(summary.inverted_removed, 1);
/// assert_eq!(repaired.tetrahedra.len(), 5);
/// ```
pub fn repair_mesh(mesh: &TetMesh, params: &RepairParams) -> RepairResult<(TetMesh, RepairSummary)> {
    let report = check_orientation(mesh, params.volume_tolerance)?;
    let filtered = remove_invalid_elements(mesh, &report);

    let repaired = if params.remove_unreferenced {
        remove_unreferenced_vertices(&filtered)?
    } else {
        filtered
    };

    let summary = RepairSummary {
        initial_vertices: mesh.vertices.len(),
        initial_elements: mesh.tetrahedra.len(),
        final_vertices: repaired.vertices.len(),
        final_elements: repaired.tetrahedra.len(),
        inverted_removed: report.inverted.len(),
        degenerate_removed: report.degenerate.len(),
        unreferenced_removed: mesh.vertices.len() - repaired.vertices.len(),
    };

    if summary.had_changes() {
        info!(%summary, "repaired mesh");
    }

    Ok((repaired, summary))
}
