//! Indexed tetrahedral mesh.

use crate::{Aabb, MeshBounds, MeshError, MeshResult, MeshTopology, Tetrahedron};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed tetrahedral mesh.
///
/// Vertex identity is positional: element connectivity stores indices into
/// `vertices`, and two vertices are only "the same point" if their
/// coordinates coincide. Welding across a shared boundary is handled by the
/// `tetmesh-weld` crate.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Point3<f64>>` - Vertex positions
/// - `tetrahedra`: `Vec<[u32; 4]>` - Elements as vertex indices
/// - `regions`: `Option<Vec<i32>>` - Optional per-element region tag
///
/// # Example
///
/// ```
/// use tetmesh_types::{TetMesh, Point3, MeshTopology};
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
/// let mesh = TetMesh::try_from_parts(vertices, vec![[0, 1, 2, 3]]).unwrap();
///
/// assert_eq!(mesh.vertex_count(), 4);
/// assert!(TetMesh::try_from_parts(vec![], vec![[0, 1, 2, 3]]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TetMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Tetrahedra as indices into the vertex array.
    /// Positive signed volume is the orientation convention.
    pub tetrahedra: Vec<[u32; 4]>,

    /// Optional region tag per element (the Medit `ref` column).
    pub regions: Option<Vec<i32>>,
}

impl TetMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tetrahedra: Vec::new(),
            regions: None,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, element_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            tetrahedra: Vec::with_capacity(element_count),
            regions: None,
        }
    }

    /// Create a mesh from vertices and elements without validation.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, tetrahedra: Vec<[u32; 4]>) -> Self {
        Self {
            vertices,
            tetrahedra,
            regions: None,
        }
    }

    /// Create a mesh from vertices and elements, rejecting dangling indices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] if any element references a
    /// vertex that does not exist.
    pub fn try_from_parts(
        vertices: Vec<Point3<f64>>,
        tetrahedra: Vec<[u32; 4]>,
    ) -> MeshResult<Self> {
        let mesh = Self::from_parts(vertices, tetrahedra);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Attach per-element region tags.
    #[must_use]
    pub fn with_regions(mut self, regions: Vec<i32>) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Check the data-model invariants.
    ///
    /// # Errors
    ///
    /// - [`MeshError::TooManyVertices`] if the vertex count exceeds `u32`
    /// - [`MeshError::IndexOutOfRange`] for the first dangling index
    /// - [`MeshError::RegionCountMismatch`] if region tags do not line up
    pub fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        if u32::try_from(vertex_count).is_err() {
            return Err(MeshError::TooManyVertices { vertex_count });
        }

        for (element, tet) in self.tetrahedra.iter().enumerate() {
            if let Some(&index) = tet.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    element,
                    index,
                    vertex_count,
                });
            }
        }

        if let Some(regions) = &self.regions {
            if regions.len() != self.tetrahedra.len() {
                return Err(MeshError::RegionCountMismatch {
                    elements: self.tetrahedra.len(),
                    regions: regions.len(),
                });
            }
        }

        Ok(())
    }

    /// Region tag of an element, if tags are present.
    #[inline]
    #[must_use]
    pub fn region(&self, element: usize) -> Option<i32> {
        self.regions.as_ref().and_then(|r| r.get(element).copied())
    }

    /// Signed volume of every element, in element order.
    ///
    /// # Panics
    ///
    /// Panics if an element references a missing vertex; call
    /// [`validate`](Self::validate) first on untrusted input.
    #[must_use]
    pub fn element_volumes(&self) -> Vec<f64> {
        self.tetrahedra
            .iter()
            .map(|tet| self.resolve(tet).signed_volume())
            .collect()
    }

    /// Sum of the signed element volumes.
    ///
    /// For a positively oriented mesh this is the enclosed volume.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.tetrahedra
            .iter()
            .map(|tet| self.resolve(tet).signed_volume())
            .sum()
    }

    /// Resolve an element's vertex positions.
    #[inline]
    #[must_use]
    pub fn resolve(&self, tet: &[u32; 4]) -> Tetrahedron {
        Tetrahedron::new(
            self.vertices[tet[0] as usize],
            self.vertices[tet[1] as usize],
            self.vertices[tet[2] as usize],
            self.vertices[tet[3] as usize],
        )
    }

    /// Iterate over all elements with resolved positions.
    pub fn tetrahedra_resolved(&self) -> impl Iterator<Item = Tetrahedron> + '_ {
        self.tetrahedra.iter().map(|tet| self.resolve(tet))
    }

    /// Flip the orientation of every element in place.
    ///
    /// The second and third vertex of each element trade places. A single
    /// transposition is needed here: reversing all four indices is an even
    /// permutation and leaves the signed volume unchanged.
    pub fn reverse_winding(&mut self) {
        for tet in &mut self.tetrahedra {
            tet.swap(1, 2);
        }
    }

    /// Translate all vertices by `offset` in place.
    pub fn translate_in_place(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Scale all vertices about the origin in place.
    pub fn scale_in_place(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.coords *= factor;
        }
    }
}

impl MeshTopology for TetMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn element_count(&self) -> usize {
        self.tetrahedra.len()
    }

    fn vertex(&self, index: usize) -> Option<&Point3<f64>> {
        self.vertices.get(index)
    }

    fn element(&self, index: usize) -> Option<[u32; 4]> {
        self.tetrahedra.get(index).copied()
    }
}

impl MeshBounds for TetMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }
}

/// Kuhn split of the unit cell into six tetrahedra sharing the diagonal 0-6.
/// Indices refer to `CUBE_CORNERS`.
const CUBE_TETS: [[u32; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 5, 1, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 4, 5, 6],
    [0, 7, 4, 6],
];

/// Corner offsets of the unit cell in `CUBE_TETS` numbering.
const CUBE_CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Create the unit cube `[0, 1]^3` as six positively oriented tetrahedra.
///
/// # Example
///
/// ```
/// use tetmesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.element_count(), 6);
/// assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn unit_cube() -> TetMesh {
    let vertices = CUBE_CORNERS
        .iter()
        .map(|&[x, y, z]| Point3::new(x as f64, y as f64, z as f64))
        .collect();
    TetMesh::from_parts(vertices, CUBE_TETS.to_vec())
}

/// Create a conforming block of `divisions` cells spanning `[0, extent]`.
///
/// Every cell is split with the same six-tetrahedron pattern as
/// [`unit_cube`], so neighbouring cells share faces exactly. Useful as a
/// stand-in for generator output in tests and benchmarks.
///
/// Divisions of zero are treated as one.
///
/// # Example
///
/// ```
/// use tetmesh_types::{block_mesh, MeshTopology, Vector3};
///
/// let block = block_mesh([2, 1, 1], Vector3::new(2.0, 1.0, 1.0));
/// assert_eq!(block.vertex_count(), 12);
/// assert_eq!(block.element_count(), 12);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn block_mesh(divisions: [usize; 3], extent: Vector3<f64>) -> TetMesh {
    let [nx, ny, nz] = divisions.map(|d| d.max(1));
    let (px, py) = (nx + 1, ny + 1);
    let node = |i: usize, j: usize, k: usize| (i + px * (j + py * k)) as u32;

    let mut mesh = TetMesh::with_capacity(px * py * (nz + 1), 6 * nx * ny * nz);
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.vertices.push(Point3::new(
                    extent.x * i as f64 / nx as f64,
                    extent.y * j as f64 / ny as f64,
                    extent.z * k as f64 / nz as f64,
                ));
            }
        }
    }

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let corners = CUBE_CORNERS.map(|[dx, dy, dz]| node(i + dx, j + dy, k + dz));
                for tet in &CUBE_TETS {
                    mesh.tetrahedra.push(tet.map(|c| corners[c as usize]));
                }
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_mesh() {
        let mesh = TetMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.validate().is_ok());
        assert_relative_eq!(mesh.signed_volume(), 0.0);
    }

    #[test]
    fn unit_cube_is_positive() {
        let cube = unit_cube();
        for v in cube.element_volumes() {
            assert!(v > 0.0);
        }
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn validate_dangling_index() {
        let mut mesh = unit_cube();
        mesh.tetrahedra.push([0, 1, 2, 8]);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                element: 6,
                index: 8,
                vertex_count: 8,
            })
        );
    }

    #[test]
    fn validate_region_count() {
        let mesh = unit_cube().with_regions(vec![1, 1]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::RegionCountMismatch {
                elements: 6,
                regions: 2
            })
        ));
        assert_eq!(mesh.region(1), Some(1));
        assert_eq!(mesh.region(5), None);
    }

    #[test]
    fn reverse_winding_negates_volume() {
        let mut cube = unit_cube();
        cube.reverse_winding();
        assert_relative_eq!(cube.signed_volume(), -1.0, epsilon = 1e-12);
        assert!(cube.element_volumes().iter().all(|&v| v < 0.0));
        cube.reverse_winding();
        assert_eq!(cube, unit_cube());
    }

    #[test]
    fn in_place_transforms() {
        let mut cube = unit_cube();
        cube.scale_in_place(2.0);
        cube.translate_in_place(Vector3::new(-1.0, 0.0, 0.0));
        let bounds = cube.bounds();
        assert_relative_eq!(bounds.min, Point3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(bounds.max, Point3::new(1.0, 2.0, 2.0));
        assert_relative_eq!(cube.signed_volume(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn block_mesh_volume_and_validity() {
        let block = block_mesh([3, 2, 2], Vector3::new(3.0, 1.0, 0.5));
        assert!(block.validate().is_ok());
        assert_eq!(block.vertex_count(), 4 * 3 * 3);
        assert_eq!(block.element_count(), 6 * 3 * 2 * 2);
        assert!(block.element_volumes().iter().all(|&v| v > 0.0));
        assert_relative_eq!(block.signed_volume(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn tetrahedron_lookup() {
        let cube = unit_cube();
        let tet = cube.tetrahedron(0).unwrap();
        assert_relative_eq!(tet.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        assert!(cube.tetrahedron(6).is_none());
    }
}
