//! Merge segment inliers back into one point set.

use crate::config::ThresholdSection;
use crate::core::{Point3D, ValueRange};
use crate::error::{AnalysisError, Result};
use crate::segment::{Segment, SegmentTree};

/// Concatenates plane inliers of a segment selection.
///
/// Output order is segment order, then inlier order within each segment.
#[derive(Clone, Debug)]
pub struct Merger {
    sd_range: ValueRange,
}

impl Merger {
    /// Create a merger whose default selection uses the SD range.
    pub fn new(thresholds: &ThresholdSection) -> Self {
        Self {
            sd_range: thresholds.sd,
        }
    }

    /// Root children whose full-point height SD lies strictly inside the SD
    /// range. This is not the residual SD used for flagging.
    pub fn select_default<'t>(&self, tree: &'t SegmentTree) -> Vec<&'t Segment> {
        tree.children()
            .filter(|s| {
                s.point_statistics()
                    .is_some_and(|st| self.sd_range.contains(st.standard_deviation))
            })
            .collect()
    }

    /// Merge inliers in each segment's local coordinates.
    ///
    /// An empty `segments` slice merges the default selection. Fails with
    /// [`AnalysisError::EmptyResult`] when nothing is left to merge.
    pub fn merge(&self, tree: &SegmentTree, segments: &[&Segment]) -> Result<Vec<Point3D>> {
        self.collect(tree, segments, |s| s.plane().inliers().to_vec())
    }

    /// Like [`merge`](Self::merge), with every inlier shifted back by its
    /// segment's origin so the result shares one absolute frame.
    pub fn merge_absolute(&self, tree: &SegmentTree, segments: &[&Segment]) -> Result<Vec<Point3D>> {
        self.collect(tree, segments, |s| s.absolute_inliers().collect())
    }

    fn collect<F>(&self, tree: &SegmentTree, segments: &[&Segment], points_of: F) -> Result<Vec<Point3D>>
    where
        F: Fn(&Segment) -> Vec<Point3D>,
    {
        let default_selection;
        let selection = if segments.is_empty() {
            default_selection = self.select_default(tree);
            log::debug!(
                "Default merge selection: {} segments with SD in {:?}",
                default_selection.len(),
                self.sd_range
            );
            default_selection.as_slice()
        } else {
            segments
        };

        let merged: Vec<Point3D> = selection.iter().flat_map(|s| points_of(*s)).collect();
        if merged.is_empty() {
            return Err(AnalysisError::EmptyResult);
        }

        log::info!(
            "Merged {} points from {} segments",
            merged.len(),
            selection.len()
        );
        Ok(merged)
    }
}
