//! Coincident-point detection between and within point sets.

use hashbrown::HashSet;
use tetmesh_types::Point3;
use tracing::debug;

use crate::spatial::PointIndex;
use crate::{WeldError, WeldResult};

/// A query point that coincides with a reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coincidence {
    /// Index into the query set.
    pub query: u32,
    /// Index of the nearest reference point.
    pub reference: u32,
    /// Distance between the two points.
    pub distance: f64,
}

pub(crate) fn check_tolerance(tolerance: f64) -> WeldResult<()> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(WeldError::InvalidTolerance { tolerance })
    }
}

/// Find query points that coincide with a reference point.
///
/// Builds a k-d tree over `reference` and looks up the nearest neighbour of
/// every query point. A pair is reported when the distance is at most
/// `tolerance`. Results are in query order, at most one per query point.
///
/// # Errors
///
/// Returns [`WeldError::InvalidTolerance`] if `tolerance` is negative or not
/// finite.
///
/// # Example
///
/// ```
/// use tetmesh_weld::find_coincident_points;
/// use tetmesh_types::Point3;
///
/// let reference = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
/// let query = vec![Point3::new(1.0, 0.001, 0.0), Point3::new(5.0, 5.0, 5.0)];
///
/// let hits = find_coincident_points(&reference, &query, 0.01).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!((hits[0].query, hits[0].reference), (0, 1));
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn find_coincident_points(
    reference: &[Point3<f64>],
    query: &[Point3<f64>],
    tolerance: f64,
) -> WeldResult<Vec<Coincidence>> {
    check_tolerance(tolerance)?;
    let index = PointIndex::new(reference);

    let hits: Vec<Coincidence> = query
        .iter()
        .enumerate()
        .filter_map(|(q, point)| {
            let (reference, distance) = index.nearest(point)?;
            (distance <= tolerance).then_some(Coincidence {
                query: q as u32,
                reference,
                distance,
            })
        })
        .collect();

    debug!(
        reference = reference.len(),
        query = query.len(),
        coincident = hits.len(),
        tolerance,
        "coincident point search"
    );
    Ok(hits)
}

/// Find pairs of points within `tolerance` of each other in one set.
///
/// Returns sorted pairs `(i, j)` with `i < j`. A point never pairs with
/// itself.
///
/// # Errors
///
/// Returns [`WeldError::InvalidTolerance`] if `tolerance` is negative or not
/// finite.
#[allow(clippy::cast_possible_truncation)]
pub fn find_duplicate_points(points: &[Point3<f64>], tolerance: f64) -> WeldResult<Vec<(u32, u32)>> {
    check_tolerance(tolerance)?;
    let index = PointIndex::new(points);

    let mut pairs: HashSet<(u32, u32)> = HashSet::new();
    for (i, point) in points.iter().enumerate() {
        let i = i as u32;
        for (j, _) in index.within(point, tolerance) {
            if j != i {
                pairs.insert((i.min(j), i.max(j)));
            }
        }
    }

    let mut pairs: Vec<_> = pairs.into_iter().collect();
    pairs.sort_unstable();
    debug!(points = points.len(), duplicates = pairs.len(), "duplicate point search");
    Ok(pairs)
}
