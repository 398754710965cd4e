//! Threshold configuration section.

use serde::{Deserialize, Serialize};

use crate::core::ValueRange;

use super::defaults;

/// Anomaly flag threshold and statistic range filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSection {
    /// Residual SD above which a segment is flagged (strict).
    #[serde(default = "defaults::flag_threshold")]
    pub flag: f64,

    /// Open range for the mean inlier height.
    #[serde(default = "defaults::mean_range")]
    pub mean: ValueRange,

    /// Open range for the inlier height SD. Also selects segments for the
    /// default merge (against full-point SD).
    #[serde(default = "defaults::sd_range")]
    pub sd: ValueRange,

    /// Open range for the standard error of the mean inlier height.
    #[serde(default = "defaults::se_range")]
    pub se: ValueRange,
}

impl Default for ThresholdSection {
    fn default() -> Self {
        Self {
            flag: defaults::flag_threshold(),
            mean: defaults::mean_range(),
            sd: defaults::sd_range(),
            se: defaults::se_range(),
        }
    }
}
