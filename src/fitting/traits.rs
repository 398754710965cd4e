//! Trait for plane fitting strategies.

use crate::core::Point3D;
use crate::plane::PlaneCoefficients;

use super::{FitConfig, FitError};

/// Raw output of a plane fit.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneFit {
    /// Coefficients `(a, b, c, d)` of `a·x + b·y + c·z + d = 0`.
    pub coefficients: PlaneCoefficients,
    /// Indices into the fitted point slice of the points within
    /// `distance_threshold` of the plane.
    pub inliers: Vec<usize>,
}

/// Strategy for fitting a plane to a point set.
///
/// Implementations may be randomized internally; callers treat a fit as a
/// single blocking call and do not observe the random process.
///
/// # Example
///
/// ```rust
/// use samatala::core::Point3D;
/// use samatala::fitting::{FitConfig, PlaneFitter, RansacPlaneFitter};
///
/// let points: Vec<Point3D> = (0..50)
///     .map(|i| Point3D::new((i % 10) as f64, (i / 10) as f64, 2.0))
///     .collect();
///
/// let fitter = RansacPlaneFitter::new();
/// let config = FitConfig::default().with_distance_threshold(0.1).with_seed(7);
/// let fit = fitter.fit(&points, &config).unwrap();
/// assert_eq!(fit.inliers.len(), 50);
/// ```
pub trait PlaneFitter: Send + Sync {
    /// Fit a plane to `points`.
    fn fit(&self, points: &[Point3D], config: &FitConfig) -> Result<PlaneFit, FitError>;
}

impl<F: PlaneFitter + ?Sized> PlaneFitter for &F {
    fn fit(&self, points: &[Point3D], config: &FitConfig) -> Result<PlaneFit, FitError> {
        (**self).fit(points, config)
    }
}

impl<F: PlaneFitter + ?Sized> PlaneFitter for Box<F> {
    fn fit(&self, points: &[Point3D], config: &FitConfig) -> Result<PlaneFit, FitError> {
        (**self).fit(points, config)
    }
}
