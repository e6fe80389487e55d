//! Read-only views over tetrahedral meshes.

use crate::{Aabb, Tetrahedron};
use nalgebra::Point3;

/// Indexed access to vertices and elements.
///
/// Quality checks only go through this view, so they also run on meshes
/// stored outside [`TetMesh`](crate::TetMesh).
pub trait MeshTopology {
    /// Vertices stored.
    fn vertex_count(&self) -> usize;

    /// Tetrahedra stored.
    fn element_count(&self) -> usize;

    /// No vertices or no elements.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.element_count() == 0
    }

    /// Position of vertex `index`, if it exists.
    fn vertex(&self, index: usize) -> Option<&Point3<f64>>;

    /// Vertex indices of element `index`, if it exists.
    fn element(&self, index: usize) -> Option<[u32; 4]>;

    /// Element `element_index` with its corner positions looked up.
    ///
    /// `None` when the element is missing or points at a missing vertex.
    fn tetrahedron(&self, element_index: usize) -> Option<Tetrahedron> {
        let [a, b, c, d] = self.element(element_index)?;
        Some(Tetrahedron::new(
            *self.vertex(a as usize)?,
            *self.vertex(b as usize)?,
            *self.vertex(c as usize)?,
            *self.vertex(d as usize)?,
        ))
    }
}

/// Extent of a vertex cloud.
pub trait MeshBounds {
    /// Box around every vertex; [`Aabb::empty`] when there are none.
    fn bounds(&self) -> Aabb;

    /// Like [`bounds`](Self::bounds), but `None` for a vertex-free mesh.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Midpoint of the box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
