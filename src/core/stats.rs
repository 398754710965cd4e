//! Descriptive statistics over height samples.
//!
//! Two flavours of dispersion are used by the analysis and they must not be
//! mixed up:
//!
//! - [`HeightStatistics`] uses the Bessel-corrected (sample) variance. It
//!   describes the spread of inlier or segment heights and drives the
//!   mean/SD/SE range filters.
//! - [`population_std_dev`] divides by `n`. It is applied to plane residuals
//!   and drives anomaly flagging.
//!
//! All functions are pure: the same input slice always yields bit-identical
//! output.

use serde::Serialize;

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the mean.
fn sum_squared_deviations(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum()
}

/// Population variance (divides by `n`). `None` for an empty slice.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(sum_squared_deviations(values, m) / values.len() as f64)
}

/// Population standard deviation. `None` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Sample variance (divides by `n - 1`).
///
/// A single sample has no spread and yields `0.0`; an empty slice yields
/// `None`.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    Some(sum_squared_deviations(values, m) / (values.len() - 1) as f64)
}

/// Summary of a set of heights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeightStatistics {
    /// Number of samples
    pub count: usize,
    /// Mean height
    pub mean: f64,
    /// Sample variance
    pub variance: f64,
    /// Sample standard deviation
    pub standard_deviation: f64,
    /// Standard error of the mean (`SD / sqrt(count)`)
    pub standard_error: f64,
}

impl HeightStatistics {
    /// Compute statistics over `values`. `None` if empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let variance = sample_variance(values)?;
        let standard_deviation = variance.sqrt();
        let count = values.len();

        Some(Self {
            count,
            mean,
            variance,
            standard_deviation,
            standard_error: standard_deviation / (count as f64).sqrt(),
        })
    }
}
