//! k-d tree point index over mesh vertices.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use tetmesh_types::Point3;

/// Nearest-neighbour index over a fixed point set.
///
/// Wraps an immutable kiddo tree. The immutable tree tolerates many points
/// sharing a coordinate on one axis, which is exactly the situation on a
/// mirror plane. An empty point set has no tree and answers every query
/// with nothing.
pub struct PointIndex {
    tree: Option<ImmutableKdTree<f64, 3>>,
}

/// Squared search radius that admits points at exactly `tolerance`.
fn search_radius(tolerance: f64) -> f64 {
    let tol_sq = tolerance * tolerance;
    tol_sq + tol_sq * f64::EPSILON + f64::MIN_POSITIVE
}

fn key(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

impl PointIndex {
    /// Build an index over `points`; item `i` refers to `points[i]`.
    #[must_use]
    pub fn new(points: &[Point3<f64>]) -> Self {
        if points.is_empty() {
            return Self { tree: None };
        }
        let entries: Vec<[f64; 3]> = points.iter().map(key).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&entries)),
        }
    }

    /// Nearest indexed point to `query` as `(index, distance)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest(&self, query: &Point3<f64>) -> Option<(u32, f64)> {
        let tree = self.tree.as_ref()?;
        let nn = tree.nearest_one::<SquaredEuclidean>(&key(query));
        Some((nn.item as u32, nn.distance.sqrt()))
    }

    /// All indexed points within `tolerance` of `query`, nearest first,
    /// as `(index, distance)` pairs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn within(&self, query: &Point3<f64>, tolerance: f64) -> Vec<(u32, f64)> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let tol_sq = tolerance * tolerance;
        let mut hits: Vec<(u32, f64)> = tree
            .within::<SquaredEuclidean>(&key(query), search_radius(tolerance))
            .into_iter()
            .filter(|nn| nn.distance <= tol_sq)
            .map(|nn| (nn.item as u32, nn.distance.sqrt()))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index() {
        let index = PointIndex::new(&[]);
        assert!(index.nearest(&Point3::origin()).is_none());
        assert!(index.within(&Point3::origin(), 1.0).is_empty());
    }

    #[test]
    fn nearest_and_within() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        ];
        let index = PointIndex::new(&points);

        let (i, d) = index.nearest(&Point3::new(0.9, 0.0, 0.0)).unwrap();
        assert_eq!(i, 1);
        assert!((d - 0.1).abs() < 1e-12);

        let hits = index.within(&Point3::origin(), 0.5);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn zero_tolerance_finds_exact_match() {
        let points = vec![Point3::new(0.25, 0.5, 0.75)];
        let index = PointIndex::new(&points);
        assert_eq!(index.within(&points[0], 0.0), vec![(0, 0.0)]);
    }

    #[test]
    fn many_points_on_one_plane() {
        let points: Vec<_> = (0..40)
            .flat_map(|j| (0..40).map(move |k| Point3::new(0.0, f64::from(j), f64::from(k))))
            .collect();
        let index = PointIndex::new(&points);
        let (i, d) = index.nearest(&Point3::new(0.0, 7.0, 9.0)).unwrap();
        assert_eq!(i, 7 * 40 + 9);
        assert!(d.abs() < 1e-12);

        let hits = index.within(&Point3::new(0.0, 20.0, 20.0), 1.0);
        let found: Vec<u32> = hits.iter().map(|&(i, _)| i).collect();
        assert_eq!(found[0], 20 * 40 + 20);
        assert_eq!(found.len(), 5);
    }
}
