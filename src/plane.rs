//! Fitted plane with inlier statistics.
//!
//! A [`Plane`] couples the equation `a·x + b·y + c·z + d = 0` with the inlier
//! points the fitter accepted. Two kinds of dispersion are derived from it:
//!
//! - **Inlier height statistics** ([`Plane::statistics`]): mean, variance,
//!   SD and SE of the inlier z values. Used by range filters.
//! - **Residual dispersion** ([`Plane::residual_standard_deviation`]):
//!   population SD of `z − plane.z(x, y)` over the inliers. Used for
//!   anomaly flagging.
//!
//! Both are recomputed from the inliers on every call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::stats::{self, HeightStatistics};
use crate::core::{Point3D, heights};
use crate::error::{AnalysisError, Result};
use crate::fitting::{FitError, PlaneFit};

/// Coefficients `(a, b, c, d)` of `a·x + b·y + c·z + d = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneCoefficients {
    /// X coefficient
    pub a: f64,
    /// Y coefficient
    pub b: f64,
    /// Z coefficient
    pub c: f64,
    /// Offset
    pub d: f64,
}

impl PlaneCoefficients {
    /// Create a new coefficient set.
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// True if the plane contains the z axis direction (`c == 0`).
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.c == 0.0
    }

    /// True if all four coefficients are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    /// Height of the plane at `(x, y)`.
    ///
    /// Only meaningful for non-vertical planes; [`Plane`] guarantees that.
    #[inline]
    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        (-self.a * x - self.b * y - self.d) / self.c
    }

    /// Signed point-to-plane distance, assuming a unit normal.
    #[inline]
    pub fn signed_distance(&self, p: &Point3D) -> f64 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }
}

/// A non-vertical plane and the points that support it.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    coefficients: PlaneCoefficients,
    inliers: Vec<Point3D>,
}

impl Plane {
    /// Create a plane from coefficients and inlier points.
    ///
    /// Fails with [`AnalysisError::InvalidArgument`] if `c == 0` or any
    /// coefficient is not finite. Zero is a valid value for `a`, `b` and `d`.
    pub fn new(coefficients: PlaneCoefficients, inliers: Vec<Point3D>) -> Result<Self> {
        if !coefficients.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "plane coefficients must be finite, got {:?}",
                coefficients
            )));
        }
        if coefficients.is_vertical() {
            return Err(AnalysisError::invalid(
                "plane coefficient c must be non-zero (vertical planes have no height function)",
            ));
        }

        Ok(Self {
            coefficients,
            inliers,
        })
    }

    /// Build a plane from a fitter result over `points`.
    ///
    /// Inlier indices are resolved against `points` immediately, so the
    /// plane's inliers are always drawn from the fitted set. Each index may
    /// appear once, which keeps `inlier_count() <= points.len()`.
    pub fn from_fit(points: &[Point3D], fit: PlaneFit) -> Result<Self> {
        let mut seen = vec![false; points.len()];
        let mut inliers = Vec::with_capacity(fit.inliers.len().min(points.len()));

        for &index in &fit.inliers {
            let Some(taken) = seen.get_mut(index) else {
                return Err(FitError::InlierOutOfRange {
                    index,
                    len: points.len(),
                }
                .into());
            };
            if *taken {
                return Err(FitError::DuplicateInlier { index }.into());
            }
            *taken = true;
            inliers.push(points[index]);
        }

        Self::new(fit.coefficients, inliers)
    }

    /// Plane coefficients.
    #[inline]
    pub fn coefficients(&self) -> PlaneCoefficients {
        self.coefficients
    }

    /// Inlier points, in fitter order.
    #[inline]
    pub fn inliers(&self) -> &[Point3D] {
        &self.inliers
    }

    /// Number of inliers.
    #[inline]
    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }

    /// Height of the plane at `(x, y)`.
    #[inline]
    pub fn z(&self, x: f64, y: f64) -> f64 {
        self.coefficients.z_at(x, y)
    }

    /// Signed vertical distance between `point` and the plane.
    #[inline]
    pub fn residual(&self, point: &Point3D) -> f64 {
        point.z - self.z(point.x, point.y)
    }

    /// Residuals of all inliers, in inlier order.
    pub fn residuals(&self) -> Vec<f64> {
        self.inliers.iter().map(|p| self.residual(p)).collect()
    }

    /// Population SD of the inlier residuals. `None` without inliers.
    pub fn residual_standard_deviation(&self) -> Option<f64> {
        stats::population_std_dev(&self.residuals())
    }

    /// Inlier height statistics. `None` without inliers.
    pub fn statistics(&self) -> Option<HeightStatistics> {
        HeightStatistics::from_values(&heights(&self.inliers))
    }

    /// Mean inlier height.
    pub fn mean(&self) -> Option<f64> {
        self.statistics().map(|s| s.mean)
    }

    /// Sample variance of inlier heights.
    pub fn variance(&self) -> Option<f64> {
        self.statistics().map(|s| s.variance)
    }

    /// Sample SD of inlier heights.
    pub fn standard_deviation(&self) -> Option<f64> {
        self.statistics().map(|s| s.standard_deviation)
    }

    /// Standard error of the mean inlier height.
    pub fn standard_error(&self) -> Option<f64> {
        self.statistics().map(|s| s.standard_error)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PlaneCoefficients { a, b, c, d } = self.coefficients;
        write!(
            f,
            "{:.4}x + {:.4}y + {:.4}z + {:.4}=0 with {} inliers",
            a,
            b,
            c,
            d,
            self.inliers.len()
        )
    }
}
