//! Open value ranges used by statistic thresholds.

use serde::{Deserialize, Serialize};

/// A `(lower, upper)` bound pair compared with strict inequality on both ends.
///
/// A value equal to either bound is outside the range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Exclusive lower bound
    pub lower: f64,
    /// Exclusive upper bound
    pub upper: f64,
}

impl ValueRange {
    /// Create a new range.
    #[inline]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// True if `lower < value < upper`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lower < value && value < self.upper
    }

    /// True if both bounds are finite and `lower <= upper`.
    pub fn is_well_formed(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}
