//! Property-based tests for welding and merging.
//!
//! Run with: cargo test -p tetmesh-weld -- proptest

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use proptest::prelude::*;
use tetmesh_transform::{MirrorPlane, reflect};
use tetmesh_types::{Axis, MeshBounds, MeshTopology, Point3, TetMesh, Vector3, block_mesh};
use tetmesh_weld::{
    MergeParams, VertexCompaction, WeldCheck, find_duplicate_points, merge_meshes, mirror_and_merge,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

/// A conforming block mesh with random resolution and extent.
fn arb_block() -> impl Strategy<Value = TetMesh> {
    (
        prop::array::uniform3(1usize..4),
        prop::array::uniform3(0.25..4.0f64),
    )
        .prop_map(|(divisions, [x, y, z])| block_mesh(divisions, Vector3::new(x, y, z)))
}

/// Number of vertices whose `axis` coordinate equals `offset` exactly.
fn count_on_plane(mesh: &TetMesh, axis: Axis, offset: f64) -> usize {
    mesh.vertices.iter().filter(|v| axis.coord(v) == offset).count()
}

// =============================================================================
// Merge invariants
// =============================================================================

proptest! {
    #[test]
    fn proptest_mirror_merge_invariants(block in arb_block(), axis in arb_axis(), at_max in any::<bool>()) {
        let bounds = block.bounds();
        let offset = if at_max { bounds.max_along(axis) } else { bounds.min_along(axis) };
        let params = MergeParams::on_plane(axis, offset)
            .with_tolerance(1e-9)
            .with_weld_check(WeldCheck::Strict);

        let outcome = mirror_and_merge(&block, &params).unwrap();
        let mesh = &outcome.mesh;

        // No index out of range.
        prop_assert!(mesh.validate().is_ok());
        for tet in &mesh.tetrahedra {
            prop_assert!(tet.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }

        // Every on-plane vertex welded exactly once.
        let on_plane = count_on_plane(&block, axis, offset);
        prop_assert_eq!(outcome.report.welded, on_plane);
        prop_assert_eq!(mesh.vertex_count(), 2 * block.vertex_count() - on_plane);
        prop_assert_eq!(mesh.element_count(), 2 * block.element_count());

        // Volume additivity and orientation.
        let expected = 2.0 * block.signed_volume();
        prop_assert!((mesh.signed_volume() - expected).abs() < 1e-9 * expected.max(1.0));
        prop_assert!(mesh.element_volumes().iter().all(|&v| v > 0.0));

        // Watertight across the plane: no coincident vertices left behind.
        prop_assert!(find_duplicate_points(&mesh.vertices, 1e-9).unwrap().is_empty());
    }

    #[test]
    fn proptest_noisy_plane_vertices_still_weld(
        block in arb_block(),
        axis in arb_axis(),
        at_max in any::<bool>(),
        noise in prop::collection::vec(-0.49..0.49f64, 1..16),
    ) {
        // Mesher output rarely puts plane vertices exactly on the plane: push
        // each one off it along the axis by less than half the tolerance.
        let tolerance = 1e-3;
        let bounds = block.bounds();
        let offset = if at_max { bounds.max_along(axis) } else { bounds.min_along(axis) };
        let on_plane = count_on_plane(&block, axis, offset);

        let mut noisy = block.clone();
        let i = axis.index();
        let plane_vertices = noisy.vertices.iter_mut().filter(|v| v[i] == offset);
        for (vertex, shift) in plane_vertices.zip(noise.iter().cycle()) {
            vertex[i] += shift * tolerance;
        }

        let params = MergeParams::on_plane(axis, offset)
            .with_tolerance(tolerance)
            .with_weld_check(WeldCheck::Strict);
        let outcome = mirror_and_merge(&noisy, &params).unwrap();
        let mesh = &outcome.mesh;

        prop_assert_eq!(outcome.report.expected, on_plane);
        prop_assert_eq!(outcome.report.welded, on_plane);
        prop_assert_eq!(outcome.report.rejected_off_plane, 0);
        prop_assert_eq!(mesh.vertex_count(), 2 * block.vertex_count() - on_plane);
        prop_assert!(mesh.validate().is_ok());
        prop_assert!(mesh.element_volumes().iter().all(|&v| v > 0.0));
        prop_assert!(find_duplicate_points(&mesh.vertices, tolerance).unwrap().is_empty());
    }

    #[test]
    fn proptest_reflection_preserves_volume(block in arb_block(), axis in arb_axis(), offset in -5.0..5.0f64) {
        let mirrored = reflect(&block, MirrorPlane::new(axis, offset));
        let before = block.signed_volume();
        prop_assert!((mirrored.signed_volume() - before).abs() < 1e-9 * before.max(1.0));
    }

    #[test]
    fn proptest_disjoint_merge_adds_volume(block in arb_block(), gap in 0.5..3.0f64) {
        // Shift B well away from A so nothing welds.
        let mut shifted = block.clone();
        shifted.translate_in_place(Vector3::new(block.bounds().max.x + gap, 0.0, 0.0));

        let params = MergeParams::on_plane(Axis::X, 0.0)
            .with_tolerance(1e-6)
            .with_weld_check(WeldCheck::Off);
        let outcome = merge_meshes(&block, &shifted, &params).unwrap();

        prop_assert_eq!(outcome.report.welded, 0);
        prop_assert_eq!(outcome.mesh.vertex_count(), 2 * block.vertex_count());
        let expected = 2.0 * block.signed_volume();
        prop_assert!((outcome.mesh.signed_volume() - expected).abs() < 1e-9 * expected.max(1.0));
    }

    #[test]
    fn proptest_compaction_offsets(count in 1usize..64, picks in prop::collection::vec(any::<prop::sample::Index>(), 0..32)) {
        let dropped: Vec<u32> = picks.iter().map(|p| p.index(count) as u32).collect();
        let compaction = VertexCompaction::new(count, &dropped).unwrap();

        // Offset is the count of dropped indices strictly below.
        for i in 0..count as u32 {
            let below = (0..i).filter(|j| compaction.is_dropped(*j)).count() as u32;
            prop_assert_eq!(compaction.offset(i), below);
            if !compaction.is_dropped(i) {
                prop_assert_eq!(compaction.new_index(i), Some(i - below));
            }
        }

        // Kept indices map onto 0..kept_count without gaps.
        let mut targets: Vec<u32> = (0..count as u32).filter_map(|i| compaction.new_index(i)).collect();
        targets.dedup();
        prop_assert_eq!(targets, (0..compaction.kept_count() as u32).collect::<Vec<_>>());

        // Offset computation is deterministic.
        prop_assert_eq!(VertexCompaction::new(count, &dropped).unwrap(), compaction);
    }

    #[test]
    fn proptest_off_plane_near_misses_not_welded(
        p in prop::array::uniform3(1.0..10.0f64),
        jitter in prop::array::uniform3(-1e-4..1e-4f64),
    ) {
        // A single vertex well off the plane x = 0 and a near copy of it.
        let a = TetMesh::from_parts(vec![Point3::from(p)], vec![]);
        let q = Point3::new(p[0] + jitter[0], p[1] + jitter[1], p[2] + jitter[2]);
        let b = TetMesh::from_parts(vec![q], vec![]);

        let params = MergeParams::on_plane(Axis::X, 0.0).with_tolerance(1e-3);
        let outcome = merge_meshes(&a, &b, &params).unwrap();
        prop_assert_eq!(outcome.report.welded, 0);
        prop_assert_eq!(outcome.report.rejected_off_plane, 1);
        prop_assert_eq!(outcome.mesh.vertex_count(), 2);
    }
}

// =============================================================================
// Offset computation reuse
// =============================================================================

#[test]
fn repeated_mirror_growth_pattern() {
    // Mirroring the same mesh twice grows vertex counts identically: the weld
    // and offset computation only depend on the plane vertices.
    let block = block_mesh([2, 2, 2], Vector3::new(1.0, 1.0, 1.0));
    let params = MergeParams::exact(Axis::Y, 0.0);

    let first = mirror_and_merge(&block, &params).unwrap();
    let second = mirror_and_merge(&block, &params).unwrap();
    assert_eq!(first.report, second.report);
    assert_eq!(first.mesh, second.mesh);
}
