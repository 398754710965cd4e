//! RANSAC plane fitting.
//!
//! Repeatedly samples minimal point subsets, builds a plane hypothesis from
//! each and keeps the hypothesis with the most inliers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use samatala::fitting::{FitConfig, PlaneFitter, RansacPlaneFitter};
//!
//! let config = FitConfig::default().with_distance_threshold(175.0).with_seed(42);
//! let fit = RansacPlaneFitter::new().fit(&points, &config)?;
//! println!("{} inliers", fit.inliers.len());
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::core::Point3D;
use crate::plane::PlaneCoefficients;

use super::{FitConfig, FitError, PlaneFit, PlaneFitter};

/// Minimum points needed to define a plane.
const MIN_SAMPLE_SIZE: usize = 3;

/// Normals shorter than this (before normalization) are treated as degenerate.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Unit normals with |c| below this are treated as vertical.
const VERTICAL_EPSILON: f64 = 1e-9;

/// RANSAC implementation of [`PlaneFitter`].
#[derive(Clone, Debug, Default)]
pub struct RansacPlaneFitter;

impl RansacPlaneFitter {
    /// Create a new fitter.
    pub fn new() -> Self {
        Self
    }
}

impl PlaneFitter for RansacPlaneFitter {
    fn fit(&self, points: &[Point3D], config: &FitConfig) -> Result<PlaneFit, FitError> {
        let sample_size = config.sample_size.max(MIN_SAMPLE_SIZE);
        if points.len() < sample_size {
            return Err(FitError::InsufficientPoints {
                found: points.len(),
                required: sample_size,
            });
        }

        let mut rng = if config.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.seed)
        };

        let mut best: Option<PlaneFit> = None;
        let mut sample = Vec::with_capacity(sample_size);

        for _ in 0..config.iterations {
            sample.clear();
            sample.extend(
                index::sample(&mut rng, points.len(), sample_size)
                    .iter()
                    .map(|i| points[i]),
            );

            let Some(coefficients) = hypothesis(&sample) else {
                continue;
            };

            let best_count = best.as_ref().map_or(0, |b| b.inliers.len());
            let inliers = collect_inliers(points, &coefficients, config.distance_threshold);

            // Strictly more inliers wins; ties keep the earlier hypothesis
            if best.is_none() || inliers.len() > best_count {
                best = Some(PlaneFit {
                    coefficients,
                    inliers,
                });
            }
        }

        best.ok_or(FitError::NoConsensus {
            iterations: config.iterations,
        })
    }
}

/// Build a unit-normal, non-vertical plane through a sample.
fn hypothesis(sample: &[Point3D]) -> Option<PlaneCoefficients> {
    let coefficients = if sample.len() == MIN_SAMPLE_SIZE {
        plane_through_three(sample[0], sample[1], sample[2])?
    } else {
        plane_least_squares(sample)?
    };

    if coefficients.c.abs() < VERTICAL_EPSILON {
        return None;
    }
    Some(coefficients)
}

/// Exact plane through three points via the cross product.
fn plane_through_three(p0: Point3D, p1: Point3D, p2: Point3D) -> Option<PlaneCoefficients> {
    let normal = (p1 - p0).cross(&(p2 - p0));
    let len = normal.length();
    if !(len > DEGENERATE_EPSILON) {
        // Collinear or coincident sample
        return None;
    }

    let n = Point3D::new(normal.x / len, normal.y / len, normal.z / len);
    let d = -n.dot(&p0);
    Some(PlaneCoefficients::new(n.x, n.y, n.z, d))
}

/// Least-squares plane `z = αx + βy + γ` through a sample of more than three
/// points, returned in unit-normal form.
fn plane_least_squares(sample: &[Point3D]) -> Option<PlaneCoefficients> {
    // Normal equations
    // | Σxx Σxy Σx | |α|   |Σxz|
    // | Σxy Σyy Σy | |β| = |Σyz|
    // | Σx  Σy  n  | |γ|   |Σz |
    let (mut sxx, mut sxy, mut sx, mut syy, mut sy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut sxz, mut syz, mut sz) = (0.0, 0.0, 0.0);
    let n = sample.len() as f64;

    for p in sample {
        sxx += p.x * p.x;
        sxy += p.x * p.y;
        sx += p.x;
        syy += p.y * p.y;
        sy += p.y;
        sxz += p.x * p.z;
        syz += p.y * p.z;
        sz += p.z;
    }

    let det = det3([[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]]);
    if !(det.abs() > DEGENERATE_EPSILON) {
        return None;
    }

    // Cramer's rule
    let alpha = det3([[sxz, sxy, sx], [syz, syy, sy], [sz, sy, n]]) / det;
    let beta = det3([[sxx, sxz, sx], [sxy, syz, sy], [sx, sz, n]]) / det;
    let gamma = det3([[sxx, sxy, sxz], [sxy, syy, syz], [sx, sy, sz]]) / det;

    // αx + βy - z + γ = 0
    let norm = (alpha * alpha + beta * beta + 1.0).sqrt();
    Some(PlaneCoefficients::new(
        alpha / norm,
        beta / norm,
        -1.0 / norm,
        gamma / norm,
    ))
}

#[inline]
fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Indices of points strictly closer than `threshold` to a unit-normal plane.
fn collect_inliers(points: &[Point3D], plane: &PlaneCoefficients, threshold: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| plane.signed_distance(p).abs() < threshold)
        .map(|(i, _)| i)
        .collect()
}
