//! Property-based tests for diagnostics and repair.
//!
//! Run with: cargo test -p tetmesh-repair -- proptest

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use proptest::prelude::*;
use tetmesh_repair::{
    RepairParams, check_orientation, find_unreferenced_vertices, remove_unreferenced_vertices,
    repair_mesh, validate_mesh,
};
use tetmesh_types::{MeshTopology, Point3, TetMesh, Vector3, block_mesh};

// =============================================================================
// Strategies
// =============================================================================

/// A block mesh with a random subset of elements reversed.
fn arb_damaged_block() -> impl Strategy<Value = (TetMesh, Vec<bool>)> {
    prop::array::uniform3(1usize..4).prop_flat_map(|divisions| {
        let block = block_mesh(divisions, Vector3::new(1.0, 1.0, 1.0));
        let n = block.element_count();
        (Just(block), prop::collection::vec(any::<bool>(), n))
    })
}

/// Random points with a random (possibly empty) element list.
fn arb_loose_mesh() -> impl Strategy<Value = TetMesh> {
    (4usize..20).prop_flat_map(|n| {
        let points = prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), n);
        let tets = prop::collection::vec(prop::array::uniform4(0..n as u32), 0..6);
        (points, tets).prop_map(|(points, tets)| {
            TetMesh::from_parts(points.into_iter().map(Point3::from).collect(), tets)
        })
    })
}

// =============================================================================
// Invariants
// =============================================================================

proptest! {
    #[test]
    fn proptest_orientation_finds_every_flip((mut block, flips) in arb_damaged_block()) {
        for (tet, &flip) in block.tetrahedra.iter_mut().zip(&flips) {
            if flip {
                tet.swap(1, 2);
            }
        }
        let report = check_orientation(&block, 1e-12).unwrap();
        let expected: Vec<u32> = flips
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i as u32)
            .collect();
        prop_assert_eq!(report.inverted, expected);
        prop_assert!(report.degenerate.is_empty());
    }

    #[test]
    fn proptest_repair_leaves_valid_mesh((mut block, flips) in arb_damaged_block()) {
        let original_volumes = block.element_volumes();
        for (tet, &flip) in block.tetrahedra.iter_mut().zip(&flips) {
            if flip {
                tet.swap(1, 2);
            }
        }
        let (repaired, summary) = repair_mesh(&block, &RepairParams::default()).unwrap();

        prop_assert!(repaired.validate().is_ok());
        prop_assert!(repaired.element_volumes().iter().all(|&v| v > 1e-12));
        prop_assert!(find_unreferenced_vertices(&repaired).is_empty());
        prop_assert_eq!(summary.final_elements + summary.inverted_removed, block.element_count());

        // Subtractive: the remaining volume is exactly the unflipped part.
        let expected: f64 = original_volumes
            .iter()
            .zip(&flips)
            .filter(|(_, f)| !**f)
            .map(|(v, _)| v)
            .sum();
        prop_assert!((repaired.signed_volume() - expected).abs() < 1e-9);
    }

    #[test]
    fn proptest_compaction_keeps_geometry(mesh in arb_loose_mesh()) {
        let compacted = remove_unreferenced_vertices(&mesh).unwrap();

        prop_assert!(compacted.validate().is_ok());
        prop_assert!(find_unreferenced_vertices(&compacted).is_empty());
        prop_assert_eq!(compacted.element_count(), mesh.element_count());
        for (before, after) in mesh.tetrahedra.iter().zip(&compacted.tetrahedra) {
            for k in 0..4 {
                prop_assert_eq!(
                    mesh.vertices[before[k] as usize],
                    compacted.vertices[after[k] as usize]
                );
            }
        }
    }

    #[test]
    fn proptest_validate_never_mutates(mesh in arb_loose_mesh()) {
        let copy = mesh.clone();
        let _ = validate_mesh(&mesh).unwrap();
        prop_assert_eq!(mesh, copy);
    }
}
