//! Segment tree construction and invariants.

mod common;

use common::*;
use samatala::io::write_xyz;
use samatala::{AnalysisConfig, AnalysisError, FitError, Point3D, SegmentState, SegmentTree};

#[test]
fn test_reference_partition() {
    let tree = SegmentTree::from_points(flat_road(10_000), &config(0.003, 1.0), &FlatFitter)
        .unwrap();

    assert_eq!(tree.split_size(), 30);
    assert_eq!(tree.child_count(), 334);
    let last = tree.children().last().unwrap();
    assert_eq!(last.len(), 10);
    assert_eq!(last.source_range(), 9990..10_000);
}

#[test]
fn test_children_cover_root_exactly_once() {
    for (n, scale) in [(97, 0.1), (100, 0.25), (31, 0.5), (5, 1.0)] {
        let tree = SegmentTree::from_points(flat_road(n), &config(scale, 1.0), &FlatFitter)
            .unwrap();

        let mut next = 0;
        for child in tree.children() {
            let range = child.source_range();
            assert_eq!(range.start, next);
            assert!(range.len() <= tree.split_size());
            assert_eq!(child.len(), range.len());
            next = range.end;
        }
        assert_eq!(next, tree.root().len());
    }
}

#[test]
fn test_every_segment_has_a_local_origin() {
    let points: Vec<Point3D> = (0..40)
        .map(|i| Point3D::new(1000.0 + i as f64, 500.0 - i as f64, 20.0 + (i % 4) as f64))
        .collect();
    let tree = SegmentTree::from_points(points.clone(), &config(0.25, 1.0), &FlatFitter).unwrap();

    assert_eq!(tree.root().origin(), points[0]);
    for child in tree.children() {
        let start = child.source_range().start;
        assert_eq!(child.points()[0], Point3D::ZERO);
        assert_eq!(child.origin(), points[start]);

        let absolute: Vec<Point3D> = child.absolute_inliers().collect();
        assert_eq!(absolute, points[child.source_range()].to_vec());
    }
}

#[test]
fn test_tree_shape_and_states() {
    let tree = SegmentTree::from_points(flat_road(50), &config(0.2, 1.0), &FlatFitter).unwrap();

    let root = tree.root();
    assert!(root.is_root());
    assert_eq!(root.state(), SegmentState::Partitioned);
    assert_eq!(tree.len(), 1 + tree.child_count());

    for child in tree.children() {
        assert!(!child.is_root());
        assert!(child.children().is_empty());
        assert_eq!(child.state(), SegmentState::Leaf);
        assert_eq!(tree.parent_of(child.id()).map(|p| p.id()), Some(root.id()));
        assert!(child.plane().inlier_count() <= child.len());
    }
}

#[test]
fn test_inliers_drawn_from_segment() {
    let tree = SegmentTree::from_points(flat_road(40), &config(0.25, 1.0), &EvenInlierFitter)
        .unwrap();

    for child in tree.iter() {
        assert_eq!(child.plane().inlier_count(), child.len().div_ceil(2));
        for inlier in child.plane().inliers() {
            assert!(child.points().contains(inlier));
        }
    }
}

#[test]
fn test_empty_cloud_is_fatal() {
    let err = SegmentTree::from_points(Vec::new(), &config(0.1, 1.0), &FlatFitter).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput(_)));
}

#[test]
fn test_degenerate_split() {
    let err = SegmentTree::from_points(flat_road(100), &config(0.003, 1.0), &FlatFitter)
        .unwrap_err();
    match err {
        AnalysisError::DegenerateSplit {
            scale_factor,
            points,
        } => {
            assert_eq!(scale_factor, 0.003);
            assert_eq!(points, 100);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_source_modes_are_exclusive() {
    let cfg = config(0.1, 1.0);

    let both = SegmentTree::builder()
        .path("road.xyz")
        .points(flat_road(10))
        .build(&cfg, &FlatFitter)
        .unwrap_err();
    assert!(matches!(both, AnalysisError::InvalidArgument(_)));

    let neither = SegmentTree::builder().build(&cfg, &FlatFitter).unwrap_err();
    assert!(matches!(neither, AnalysisError::InvalidArgument(_)));
}

#[test]
fn test_build_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("road.xyz");
    let points = road_with_bump(60, 20..30, 4.0);
    write_xyz(&path, &points).unwrap();

    let tree = SegmentTree::builder()
        .path(&path)
        .build(&config(0.1, 1.0), &FlatFitter)
        .unwrap();
    assert_eq!(tree.root().len(), 60);
    assert_eq!(tree.child_count(), 10);
    assert_eq!(tree.root().origin(), points[0]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SegmentTree::builder()
        .path(dir.path().join("missing.xyz"))
        .build(&config(0.1, 1.0), &FlatFitter)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Io(_)));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut cfg = config(0.1, 1.0);
    cfg.split.scale_factor = 0.0;
    let err = SegmentTree::from_points(flat_road(10), &cfg, &FlatFitter).unwrap_err();
    assert!(matches!(err, AnalysisError::Config(_)));
}

#[test]
fn test_small_child_fit_error_propagates() {
    let mut cfg = config(0.1, 1.0);
    cfg.fit = cfg.fit.clone().with_seed(3);
    // 25 points in runs of 2: too few for a three-point sample
    let err = SegmentTree::from_points(flat_road(25), &cfg, &samatala::RansacPlaneFitter::new())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Fit(FitError::InsufficientPoints { found: 2, required: 3 })
    ));
}

#[test]
fn test_config_from_yaml_drives_split() {
    let yaml = r#"
voxel:
  size: 0.0
split:
  scale_factor: 0.05
"#;
    let cfg = AnalysisConfig::from_yaml(yaml).unwrap();
    let tree = SegmentTree::from_points(flat_road(200), &cfg, &FlatFitter).unwrap();
    assert_eq!(tree.split_size(), 10);
    assert_eq!(tree.child_count(), 20);
}

#[test]
fn test_voxel_downsampling_happens_once_at_root() {
    let mut cfg = config(0.5, 1.0);
    cfg.voxel = samatala::preprocessing::VoxelConfig::new(10.0);
    // Two clusters of 20 points each, far apart
    let points: Vec<Point3D> = (0..40)
        .map(|i| {
            let base = if i < 20 { 0.0 } else { 100.0 };
            Point3D::new(base + (i % 20) as f64 * 0.1, 0.0, 0.0)
        })
        .collect();

    let tree = SegmentTree::from_points(points, &cfg, &FlatFitter).unwrap();
    assert_eq!(tree.root().len(), 2);
    assert_eq!(tree.child_count(), 2);
    assert!(tree.children().all(|c| c.len() == 1));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_children_keep_range_order() {
    let sequential = config(0.01, 1.0);
    let mut parallel = sequential.clone();
    parallel.split.parallel = true;

    let points = road_with_bump(1000, 500..520, 3.0);
    let a = SegmentTree::from_points(points.clone(), &sequential, &FlatFitter).unwrap();
    let b = SegmentTree::from_points(points, &parallel, &FlatFitter).unwrap();

    let ranges_a: Vec<_> = a.children().map(|c| c.source_range()).collect();
    let ranges_b: Vec<_> = b.children().map(|c| c.source_range()).collect();
    assert_eq!(ranges_a, ranges_b);
    for (x, y) in a.children().zip(b.children()) {
        assert_eq!(x.id(), y.id());
        assert_eq!(x.plane(), y.plane());
    }
}
