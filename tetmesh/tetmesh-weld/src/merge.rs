//! Plane-filtered welding and merging of two tetrahedral meshes.
//!
//! Mesh A is kept whole. Vertices of mesh B that coincide with a vertex of A
//! lying on the mirror plane are dropped and B's elements are redirected to
//! the surviving A vertex; every other B vertex is appended after A's
//! vertices.

use std::fmt;

use tetmesh_transform::{MirrorPlane, reflect};
use tetmesh_types::{Axis, MeshError, TetMesh};
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coincident::check_tolerance;
use crate::spatial::PointIndex;
use crate::{VertexCompaction, WeldError, WeldResult};

/// What to do when the weld count differs from the expected count.
///
/// The expected count is the number of A vertices lying on the mirror plane.
/// For a mesh merged with its own reflection every one of them should weld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WeldCheck {
    /// Do not compare.
    Off,
    /// Log a warning on mismatch.
    #[default]
    Warn,
    /// Fail with [`WeldError::WeldCountMismatch`] on mismatch.
    Strict,
}

/// Parameters for merging two meshes across a mirror plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeParams {
    /// Axis normal to the mirror plane.
    pub axis: Axis,

    /// Position of the mirror plane along `axis` (default: 0.0).
    pub plane_offset: f64,

    /// Weld distance (default: 1e-6).
    ///
    /// Also the allowed distance of a reference vertex from the plane.
    /// Should be small compared to the local element size.
    pub tolerance: f64,

    /// Expected-vs-actual weld count check (default: warn).
    pub weld_check: WeldCheck,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            plane_offset: 0.0,
            tolerance: 1e-6,
            weld_check: WeldCheck::Warn,
        }
    }
}

impl MergeParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the plane `coord(axis) = offset`, other fields default.
    #[must_use]
    pub fn on_plane(axis: Axis, plane_offset: f64) -> Self {
        Self {
            axis,
            plane_offset,
            ..Self::default()
        }
    }

    /// Parameters that only weld bit-identical coordinates and fail on any
    /// weld count mismatch.
    #[must_use]
    pub fn exact(axis: Axis, plane_offset: f64) -> Self {
        Self {
            axis,
            plane_offset,
            tolerance: 0.0,
            weld_check: WeldCheck::Strict,
        }
    }

    /// Sets the mirror axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the plane offset.
    #[must_use]
    pub const fn with_plane_offset(mut self, offset: f64) -> Self {
        self.plane_offset = offset;
        self
    }

    /// Sets the weld tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the weld count check.
    #[must_use]
    pub const fn with_weld_check(mut self, check: WeldCheck) -> Self {
        self.weld_check = check;
        self
    }

    /// The mirror plane described by these parameters.
    #[must_use]
    pub const fn plane(&self) -> MirrorPlane {
        MirrorPlane::new(self.axis, self.plane_offset)
    }
}

/// Statistics of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// B vertices welded onto an A vertex.
    pub welded: usize,
    /// A vertices lying on the mirror plane.
    pub expected: usize,
    /// B vertices that had a spatial match, but only off the plane.
    pub rejected_off_plane: usize,
    /// B vertices appended after A's vertices.
    pub appended_vertices: usize,
    /// B elements appended after A's elements.
    pub appended_elements: usize,
}

impl MergeReport {
    /// Whether the weld count equals the expected count.
    #[must_use]
    pub const fn weld_count_matches(&self) -> bool {
        self.welded == self.expected
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merge: {} welded ({} expected), {} off-plane rejected, +{} vertices, +{} elements",
            self.welded,
            self.expected,
            self.rejected_off_plane,
            self.appended_vertices,
            self.appended_elements
        )
    }
}

/// Result of [`merge_meshes`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged mesh.
    pub mesh: TetMesh,
    /// Weld statistics.
    pub report: MergeReport,
}

/// Weld matches: for each B vertex, the A vertex it is welded to.
struct WeldMap {
    counterpart: Vec<Option<u32>>,
    dropped: Vec<u32>,
    rejected_off_plane: usize,
}

/// Match B vertices against on-plane A vertices.
///
/// Every A vertex within tolerance is a candidate; the nearest candidate
/// lying on the plane wins. Requiring the reference vertex to be on the
/// plane keeps two distinct nearby vertices off the plane apart.
#[allow(clippy::cast_possible_truncation)]
fn match_vertices(a: &TetMesh, b: &TetMesh, params: &MergeParams) -> WeldMap {
    let plane = params.plane();
    let index = PointIndex::new(&a.vertices);

    let mut counterpart = vec![None; b.vertices.len()];
    let mut dropped = Vec::new();
    let mut rejected_off_plane = 0;

    for (j, point) in b.vertices.iter().enumerate() {
        let candidates = index.within(point, params.tolerance);
        if candidates.is_empty() {
            continue;
        }
        let on_plane = candidates
            .iter()
            .find(|(i, _)| plane.contains(&a.vertices[*i as usize], params.tolerance));
        match on_plane {
            Some(&(i, _)) => {
                counterpart[j] = Some(i);
                dropped.push(j as u32);
            }
            None => rejected_off_plane += 1,
        }
    }

    WeldMap {
        counterpart,
        dropped,
        rejected_off_plane,
    }
}

fn merge_regions(a: &TetMesh, b: &TetMesh) -> Option<Vec<i32>> {
    match (&a.regions, &b.regions) {
        (None, None) => None,
        (ra, rb) => {
            let mut regions = ra.clone().unwrap_or_else(|| vec![0; a.tetrahedra.len()]);
            match rb {
                Some(rb) => regions.extend_from_slice(rb),
                None => regions.resize(regions.len() + b.tetrahedra.len(), 0),
            }
            Some(regions)
        }
    }
}

/// Merge mesh `b` into mesh `a`, welding vertices on the mirror plane.
///
/// The result holds A's vertices followed by B's non-welded vertices, and
/// A's elements followed by B's elements. In B's elements, a welded vertex
/// is replaced by its A counterpart and a kept vertex `i` becomes
/// `i - offset(i) + len(A)`.
///
/// The merged mesh satisfies the index invariants if the inputs do. It is
/// not checked for degenerate or inverted elements; use the repair crate's
/// diagnostics for that.
///
/// # Errors
///
/// - [`WeldError::InvalidTolerance`] for a negative or non-finite tolerance
/// - [`WeldError::Mesh`] if either input has dangling indices or the merged
///   vertex count overflows `u32`
/// - [`WeldError::WeldCountMismatch`] under [`WeldCheck::Strict`]
///
/// # Example
///
/// ```
/// use tetmesh_transform::{reflect, MirrorPlane};
/// use tetmesh_types::{unit_cube, Axis, MeshTopology};
/// use tetmesh_weld::{merge_meshes, MergeParams};
///
/// let cube = unit_cube();
/// let mirrored = reflect(&cube, MirrorPlane::new(Axis::X, 0.0));
///
/// let outcome = merge_meshes(&cube, &mirrored, &MergeParams::on_plane(Axis::X, 0.0)).unwrap();
/// assert_eq!(outcome.mesh.vertex_count(), 12);
/// assert_eq!(outcome.mesh.element_count(), 12);
/// assert_eq!(outcome.report.welded, 4);
/// ```
pub fn merge_meshes(a: &TetMesh, b: &TetMesh, params: &MergeParams) -> WeldResult<MergeOutcome> {
    check_tolerance(params.tolerance)?;
    a.validate()?;
    b.validate()?;

    let plane = params.plane();
    let expected = a
        .vertices
        .iter()
        .filter(|p| plane.contains(p, params.tolerance))
        .count();

    let welds = match_vertices(a, b, params);
    let compaction = VertexCompaction::new(b.vertices.len(), &welds.dropped)?;

    let merged_count = a.vertices.len() + compaction.kept_count();
    let (Ok(base), Ok(_)) = (u32::try_from(a.vertices.len()), u32::try_from(merged_count)) else {
        return Err(MeshError::TooManyVertices {
            vertex_count: merged_count,
        }
        .into());
    };

    let mut vertices = Vec::with_capacity(merged_count);
    vertices.extend_from_slice(&a.vertices);
    vertices.extend(compaction.filter(&b.vertices));

    let remap = |index: u32| -> u32 {
        match welds.counterpart[index as usize] {
            Some(target) => target,
            None => base + index - compaction.offset(index),
        }
    };

    let mut tetrahedra = Vec::with_capacity(a.tetrahedra.len() + b.tetrahedra.len());
    tetrahedra.extend_from_slice(&a.tetrahedra);
    tetrahedra.extend(b.tetrahedra.iter().map(|tet| tet.map(remap)));

    let report = MergeReport {
        welded: welds.dropped.len(),
        expected,
        rejected_off_plane: welds.rejected_off_plane,
        appended_vertices: compaction.kept_count(),
        appended_elements: b.tetrahedra.len(),
    };

    debug!(
        axis = %params.axis,
        offset = params.plane_offset,
        tolerance = params.tolerance,
        welded = report.welded,
        expected = report.expected,
        rejected_off_plane = report.rejected_off_plane,
        "weld matching complete"
    );

    if !report.weld_count_matches() {
        match params.weld_check {
            WeldCheck::Off => {}
            WeldCheck::Warn => warn!(
                welded = report.welded,
                expected = report.expected,
                "weld count differs from on-plane vertex count; check the tolerance"
            ),
            WeldCheck::Strict => {
                return Err(WeldError::WeldCountMismatch {
                    expected: report.expected,
                    welded: report.welded,
                });
            }
        }
    }

    let mesh = TetMesh {
        vertices,
        tetrahedra,
        regions: merge_regions(a, b),
    };

    info!(
        vertices = mesh.vertices.len(),
        elements = mesh.tetrahedra.len(),
        welded = report.welded,
        "merged meshes"
    );

    Ok(MergeOutcome { mesh, report })
}

/// Reflect `mesh` across the plane in `params` and merge it with its mirror
/// image.
///
/// # Errors
///
/// Same as [`merge_meshes`].
pub fn mirror_and_merge(mesh: &TetMesh, params: &MergeParams) -> WeldResult<MergeOutcome> {
    let mirrored = reflect(mesh, params.plane());
    merge_meshes(mesh, &mirrored, params)
}
