//! Contiguous range partitioning.
//!
//! A parent's `N` points are cut into runs of `S = floor(scale_factor × N)`
//! points. The last run takes whatever remains:
//!
//! ```text
//! N = 10, S = 3
//! [0 1 2][3 4 5][6 7 8][9]
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::{AnalysisError, Result};

/// Configuration for child partitioning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of the parent's point count placed in each child.
    /// Default: 0.003
    #[serde(default = "defaults::scale_factor")]
    pub scale_factor: f64,

    /// Fit children on the rayon pool when built with the `parallel` feature.
    /// Child order is unaffected.
    /// Default: false
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            scale_factor: defaults::scale_factor(),
            parallel: false,
        }
    }
}

impl SplitConfig {
    /// Create a config with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            ..Self::default()
        }
    }

    /// Builder-style setter for parallel child fitting.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Splits a point count into contiguous child ranges.
#[derive(Clone, Debug)]
pub struct Segmenter {
    scale_factor: f64,
}

impl Segmenter {
    /// Create a segmenter from split configuration.
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            scale_factor: config.scale_factor,
        }
    }

    /// Configured scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Points per child for a parent of `n` points.
    ///
    /// Fails with [`AnalysisError::EmptyInput`] for `n == 0` and
    /// [`AnalysisError::DegenerateSplit`] when the product floors to zero.
    pub fn split_size(&self, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(AnalysisError::empty("cannot split a segment with no points"));
        }

        let size = (self.scale_factor * n as f64).floor();
        if !(size >= 1.0) {
            return Err(AnalysisError::DegenerateSplit {
                scale_factor: self.scale_factor,
                points: n,
            });
        }

        Ok(size as usize)
    }

    /// Child ranges `[i·S, min((i+1)·S, n))` covering `[0, n)` exactly once.
    pub fn ranges(&self, n: usize) -> Result<Vec<Range<usize>>> {
        let size = self.split_size(n)?;

        let ranges: Vec<Range<usize>> = (0..n)
            .step_by(size)
            .map(|start| start..(start + size).min(n))
            .collect();

        log::debug!(
            "Split {} points into {} ranges of {} (last holds {})",
            n,
            ranges.len(),
            size,
            ranges.last().map_or(0, |r| r.len())
        );

        Ok(ranges)
    }
}
