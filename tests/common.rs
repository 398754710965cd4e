//! Test utilities for samatala integration tests.
//!
//! Deterministic plane fitters and synthetic road surfaces.

#![allow(dead_code)]

use samatala::preprocessing::VoxelConfig;
use samatala::{
    AnalysisConfig, FitConfig, FitError, PlaneCoefficients, PlaneFit, PlaneFitter, Point3D,
    SplitConfig,
};

/// Horizontal plane `z = 0` with every point an inlier.
///
/// Residuals equal local heights, so residual SD is the population SD of a
/// segment's z values.
pub struct FlatFitter;

impl PlaneFitter for FlatFitter {
    fn fit(&self, points: &[Point3D], _config: &FitConfig) -> Result<PlaneFit, FitError> {
        Ok(PlaneFit {
            coefficients: PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0),
            inliers: (0..points.len()).collect(),
        })
    }
}

/// Horizontal plane keeping only even-indexed points as inliers.
pub struct EvenInlierFitter;

impl PlaneFitter for EvenInlierFitter {
    fn fit(&self, points: &[Point3D], _config: &FitConfig) -> Result<PlaneFit, FitError> {
        Ok(PlaneFit {
            coefficients: PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0),
            inliers: (0..points.len()).step_by(2).collect(),
        })
    }
}

/// Always returns a vertical plane.
pub struct VerticalFitter;

impl PlaneFitter for VerticalFitter {
    fn fit(&self, points: &[Point3D], _config: &FitConfig) -> Result<PlaneFit, FitError> {
        Ok(PlaneFit {
            coefficients: PlaneCoefficients::new(1.0, 0.0, 0.0, 0.0),
            inliers: (0..points.len()).collect(),
        })
    }
}

/// Straight road strip along x, 5 lanes of y, flat at z = 0.
pub fn flat_road(n: usize) -> Vec<Point3D> {
    (0..n)
        .map(|i| Point3D::new(i as f64, (i % 5) as f64, 0.0))
        .collect()
}

/// Flat road whose points in `bump` alternate between `0` and `height`.
///
/// For an even-length bump starting at an even index the population SD of
/// the bump heights is exactly `height / 2`.
pub fn road_with_bump(n: usize, bump: std::ops::Range<usize>, height: f64) -> Vec<Point3D> {
    let mut points = flat_road(n);
    for i in bump {
        if i % 2 == 1 {
            points[i].z = height;
        }
    }
    points
}

/// Gently tilted road with a rough patch in `bump` whose heights alternate
/// by `±amplitude` around the road surface.
pub fn tilted_road(n: usize, bump: std::ops::Range<usize>, amplitude: f64) -> Vec<Point3D> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            let y = (i % 5) as f64;
            let rough = if bump.contains(&i) {
                if i % 2 == 0 { amplitude } else { -amplitude }
            } else {
                0.0
            };
            Point3D::new(x, y, 0.01 * x + 0.02 * y + rough)
        })
        .collect()
}

/// Config with downsampling disabled and the given split and flag threshold.
pub fn config(scale_factor: f64, flag: f64) -> AnalysisConfig {
    let mut config = AnalysisConfig {
        voxel: VoxelConfig::disabled(),
        split: SplitConfig::new(scale_factor),
        ..AnalysisConfig::default()
    };
    config.thresholds.flag = flag;
    config
}
