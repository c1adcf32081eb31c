//! End-to-end reconstruction scenarios.

use mask_reconstruct::{
    export_attributed, export_plain, reconstruct_mask, reconstruct_mask_with_cancel, CancelToken,
    ExportError, MeshCollection, ReconstructError, ReconstructParams,
};
use mask_types::{Point3, Vector3, Volume};

/// A mask drawing its values from {0, 1, 3, 5}: three disjoint blocks on an
/// otherwise empty 18^3 grid.
fn three_label_mask() -> Volume {
    let mut volume = Volume::zeros((18, 18, 18), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
    let mut fill = |lo: usize, hi: usize, label: f32| {
        for z in lo..hi {
            for y in lo..hi {
                for x in lo..hi {
                    volume.set(x, y, z, label);
                }
            }
        }
    };
    fill(1, 5, 1.0);
    fill(7, 11, 3.0);
    fill(13, 17, 5.0);
    volume
}

#[test]
fn scenario_a_three_labels_two_threads() {
    let volume = three_label_mask();
    let params = ReconstructParams::default().with_threads(2);

    let built = reconstruct_mask(&volume, &params).unwrap();

    assert_eq!(built.meshes.len(), 3);
    assert_eq!(built.meshes.labels(), vec![1, 3, 5]);
    assert_eq!(built.report.completed(), 3);
    assert!(built.report.empty_labels.is_empty());

    for object in &built.meshes {
        assert!(object.surface.is_tagged());
        assert!(object
            .surface
            .face_labels
            .iter()
            .all(|&l| l == object.label));
        // Closed outward surface
        assert!(object.surface.signed_volume() > 0.0);
    }

    // Plain export: one STL holding the union, no attribute
    let dir = tempfile::tempdir().unwrap();
    let stl_path = dir.path().join("union.stl");
    export_plain(&built.meshes, &stl_path).unwrap();
    let stl = mask_io::load_stl(&stl_path).unwrap();
    let total_faces: usize = built.meshes.iter().map(|o| o.surface.face_count()).sum();
    assert_eq!(stl.face_count(), total_faces);
    assert!(stl.face_labels.is_empty());

    // Attributed export: every triangle taggable back to {1, 3, 5}
    let ply_path = dir.path().join("union.ply");
    export_attributed(&built.meshes, &ply_path).unwrap();
    let ply = mask_io::load_ply(&ply_path).unwrap();
    assert_eq!(ply.face_count(), total_faces);
    let mut seen: Vec<i32> = ply.face_labels.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen, vec![1, 3, 5]);
}

#[test]
fn scenario_b_background_only_mask() {
    let volume = Volume::zeros((8, 8, 8), Vector3::new(1.0, 1.0, 1.0), Point3::origin());

    let result = reconstruct_mask(&volume, &ReconstructParams::default());
    assert!(matches!(result, Err(ReconstructError::NoLabelsFound)));

    // Any subsequent export of an (empty) collection fails and writes nothing
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.ply");
    let export = export_attributed(&MeshCollection::new(), &path);
    assert!(matches!(export, Err(ExportError::EmptyCollection)));
    assert!(!path.exists());
}

#[test]
fn scenario_c_label_without_geometry_is_skipped() {
    // Label 2 lives on a degenerate axis slab: marching cubes has no cell
    // pair to cross, so its isosurface is legitimately empty.
    let mut volume = Volume::zeros((14, 14, 1), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
    for y in 2..6 {
        for x in 2..6 {
            volume.set(x, y, 0, 1.0);
        }
    }
    volume.set(10, 10, 0, 2.0);

    let built = reconstruct_mask(&volume, &ReconstructParams::raw()).unwrap();

    // The whole grid is one voxel thick, so label 1 is empty too in this
    // slab; both labels are reported, the build still succeeds.
    assert_eq!(built.report.empty_labels, vec![1, 2]);
    assert!(built.meshes.is_empty());
}

#[test]
fn scenario_c_label_filling_the_grid_has_no_surface() {
    // Every voxel carries label 1, so the binary field never crosses the
    // 0.5 level inside any cell; the isosurface is legitimately empty.
    let volume = Volume::from_data(
        (6, 6, 6),
        Vector3::new(1.0, 1.0, 1.0),
        Point3::origin(),
        vec![1.0; 216],
    )
    .unwrap();

    let built = reconstruct_mask(&volume, &ReconstructParams::raw()).unwrap();
    assert!(built.meshes.is_empty());
    assert_eq!(built.report.empty_labels, vec![1]);
}

#[test]
fn determinism_across_thread_counts() {
    let volume = three_label_mask();

    let baseline = reconstruct_mask(&volume, &ReconstructParams::default().with_threads(1)).unwrap();

    for threads in [2, 3, 8] {
        let run =
            reconstruct_mask(&volume, &ReconstructParams::default().with_threads(threads)).unwrap();
        assert_eq!(run.meshes.labels(), baseline.meshes.labels());

        for label in run.meshes.labels() {
            let a = run.meshes.get(label).unwrap();
            let b = baseline.meshes.get(label).unwrap();
            assert_eq!(a.surface.vertex_count(), b.surface.vertex_count());
            assert_eq!(a.surface.face_count(), b.surface.face_count());
        }
    }
}

#[test]
fn repeated_builds_are_identical() {
    let volume = three_label_mask();
    let params = ReconstructParams::default();

    let first = reconstruct_mask(&volume, &params).unwrap();
    let second = reconstruct_mask(&volume, &params).unwrap();

    assert_eq!(first.meshes.labels(), second.meshes.labels());
    for label in first.meshes.labels() {
        let a = first.meshes.get(label).unwrap();
        let b = second.meshes.get(label).unwrap();
        assert_eq!(a.surface.vertices, b.surface.vertices);
        assert_eq!(a.surface.faces, b.surface.faces);
    }
}

#[test]
fn worker_count_is_clamped_by_label_count() {
    let volume = three_label_mask();

    // 64 requested, 3 labels: the pool must not exceed the label count
    let built = reconstruct_mask(&volume, &ReconstructParams::default().with_threads(64)).unwrap();
    assert_eq!(built.report.workers, 3);

    let built = reconstruct_mask(&volume, &ReconstructParams::default().with_threads(1)).unwrap();
    assert_eq!(built.report.workers, 1);
}

#[test]
fn pre_cancelled_build_reports_cancellation() {
    let volume = three_label_mask();
    let token = CancelToken::new();
    token.cancel();

    let result =
        reconstruct_mask_with_cancel(&volume, &ReconstructParams::default(), &token);
    assert!(matches!(result, Err(ReconstructError::Cancelled)));
}

#[test]
fn volume_origin_is_carried_into_objects() {
    let mut volume = Volume::zeros(
        (10, 10, 10),
        Vector3::new(0.5, 0.5, 0.5),
        Point3::new(-32.0, 10.0, 4.5),
    );
    for z in 3..7 {
        for y in 3..7 {
            for x in 3..7 {
                volume.set(x, y, z, 6.0);
            }
        }
    }

    let built = reconstruct_mask(&volume, &ReconstructParams::raw()).unwrap();
    let object = built.meshes.get(6).unwrap();
    assert_eq!(object.origin, Point3::new(-32.0, 10.0, 4.5));

    // Geometry lands in world coordinates near the shifted origin
    let bounds = object.surface.bounds();
    assert!(bounds.min.x > -32.0 && bounds.max.x < -28.0);
}
