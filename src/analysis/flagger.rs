//! Residual-dispersion anomaly flagging.

use crate::config::ThresholdSection;
use crate::error::{AnalysisError, Result};
use crate::plane::Plane;
use crate::segment::{FlagState, SegmentId, SegmentTree};

/// Flags children whose plane residuals spread more than a threshold.
///
/// The check is single-sided and strict: a residual SD exactly equal to the
/// threshold is not an anomaly.
#[derive(Clone, Copy, Debug)]
pub struct Flagger {
    threshold: f64,
}

impl Flagger {
    /// Create a flagger with an explicit threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Create a flagger from the threshold section.
    pub fn from_config(thresholds: &ThresholdSection) -> Self {
        Self::new(thresholds.flag)
    }

    /// Configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True if the plane's residual SD is strictly above the threshold.
    ///
    /// A plane without inliers has no residual dispersion and is never
    /// flagged.
    pub fn evaluate(&self, plane: &Plane) -> bool {
        plane
            .residual_standard_deviation()
            .is_some_and(|sd| sd > self.threshold)
    }

    /// Run the flag pass over every child of the tree's root.
    ///
    /// Returns the flagged ids in child order. A tree can be flagged once;
    /// a second pass fails with [`AnalysisError::InvalidArgument`] and leaves
    /// the earlier outcome untouched.
    pub fn flag(&self, tree: &mut SegmentTree) -> Result<Vec<SegmentId>> {
        let ids = tree.child_ids().to_vec();

        if let Some(done) = ids
            .iter()
            .filter_map(|&id| tree.get(id))
            .find(|s| s.flag_state() != FlagState::Pending)
        {
            return Err(AnalysisError::invalid(format!(
                "flag pass already ran (segment {} is {:?})",
                done.id(),
                done.flag_state()
            )));
        }

        let mut flagged = Vec::new();
        for id in ids {
            let Some(segment) = tree.get_mut(id) else {
                continue;
            };
            let anomalous = self.evaluate(segment.plane());
            segment.record_flag(anomalous)?;
            if anomalous {
                log::info!("flagged plane: {}", segment.plane());
                flagged.push(id);
            }
        }

        log::info!(
            "Flagged {} of {} segments (residual SD > {})",
            flagged.len(),
            tree.child_count(),
            self.threshold
        );
        Ok(flagged)
    }
}
