//! End-to-end analysis pass and its report.

use std::ops::Range;

use serde::Serialize;

use crate::config::{AnalysisConfig, ThresholdSection};
use crate::core::Point3D;
use crate::error::{AnalysisError, Result};
use crate::fitting::PlaneFitter;
use crate::plane::PlaneCoefficients;
use crate::segment::{Segment, SegmentId, SegmentTree};

use super::filter::{SegmentFilter, StatisticKind};
use super::flagger::Flagger;
use super::merger::Merger;

/// One analysis pass: build the tree, then flag it.
///
/// The returned [`AnalysisOutcome`] owns the tree and a copy of the
/// thresholds, so it may outlive the configuration.
pub struct Analysis<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> Analysis<'c> {
    /// Create an analysis over a configuration.
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run segmentation and flagging over `points`.
    pub fn run(&self, points: Vec<Point3D>, fitter: &dyn PlaneFitter) -> Result<AnalysisOutcome> {
        let mut tree = SegmentTree::from_points(points, self.config, fitter)?;
        let flagged = Flagger::from_config(&self.config.thresholds).flag(&mut tree)?;

        Ok(AnalysisOutcome {
            thresholds: self.config.thresholds.clone(),
            tree,
            flagged,
        })
    }
}

/// Flagged tree produced by [`Analysis::run`].
#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    thresholds: ThresholdSection,
    tree: SegmentTree,
    flagged: Vec<SegmentId>,
}

impl AnalysisOutcome {
    /// The flagged segment tree.
    pub fn tree(&self) -> &SegmentTree {
        &self.tree
    }

    /// Ids of flagged children, in child order.
    pub fn flagged(&self) -> &[SegmentId] {
        &self.flagged
    }

    /// Children selected by a range filter.
    pub fn filter(&self, kind: StatisticKind) -> Vec<&Segment> {
        SegmentFilter::new(&self.thresholds).filter(&self.tree, kind)
    }

    /// Merged absolute inliers of a filter's selection, or of the default
    /// SD selection when `kind` is `None`.
    pub fn merged(&self, kind: Option<StatisticKind>) -> Result<Vec<Point3D>> {
        let merger = Merger::new(&self.thresholds);
        match kind {
            Some(kind) => {
                let selection = self.filter(kind);
                if selection.is_empty() {
                    return Err(AnalysisError::EmptyResult);
                }
                merger.merge_absolute(&self.tree, &selection)
            }
            None => merger.merge_absolute(&self.tree, &[]),
        }
    }

    /// Serializable summary of the pass.
    pub fn report(&self) -> AnalysisReport {
        let root = self.tree.root();
        AnalysisReport {
            root_points: root.len(),
            root_plane: root.plane().coefficients(),
            split_size: self.tree.split_size(),
            flag_threshold: self.thresholds.flag,
            segments: self.tree.children().map(SegmentSummary::from).collect(),
            flagged: self.flagged.clone(),
        }
    }
}

/// Report over all children of one analysis pass.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    /// Points in the root after downsampling
    pub root_points: usize,
    /// Root plane in root-local coordinates
    pub root_plane: PlaneCoefficients,
    /// Points per child
    pub split_size: usize,
    /// Residual SD threshold used for flagging
    pub flag_threshold: f64,
    /// Per-child summaries in child order
    pub segments: Vec<SegmentSummary>,
    /// Flagged child ids
    pub flagged: Vec<SegmentId>,
}

/// Statistics of one child segment.
#[derive(Clone, Debug, Serialize)]
pub struct SegmentSummary {
    /// Arena id of the child
    pub id: SegmentId,
    /// Index range within the root's points
    pub range: Range<usize>,
    /// Absolute position of the child's first point
    pub origin: Point3D,
    /// Number of points in the child
    pub points: usize,
    /// Number of plane inliers
    pub inliers: usize,
    /// Plane in child-local coordinates
    pub plane: PlaneCoefficients,
    /// Mean inlier height; `None` without inliers
    pub mean: Option<f64>,
    /// Sample SD of inlier heights (the `sd` filter value)
    pub standard_deviation: Option<f64>,
    /// Standard error of the mean inlier height (the `se` filter value)
    pub standard_error: Option<f64>,
    /// Population SD of signed residuals (the flagged value)
    pub residual_standard_deviation: Option<f64>,
    /// Whether the flag pass marked this child
    pub flagged: bool,
}

impl From<&Segment> for SegmentSummary {
    fn from(segment: &Segment) -> Self {
        let plane = segment.plane();
        let stats = plane.statistics();
        Self {
            id: segment.id(),
            range: segment.source_range(),
            origin: segment.origin(),
            points: segment.len(),
            inliers: plane.inlier_count(),
            plane: plane.coefficients(),
            mean: stats.map(|s| s.mean),
            standard_deviation: stats.map(|s| s.standard_deviation),
            standard_error: stats.map(|s| s.standard_error),
            residual_standard_deviation: plane.residual_standard_deviation(),
            flagged: segment.flagged(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::{FitConfig, FitError, PlaneFit};
    use crate::preprocessing::VoxelConfig;
    use crate::segment::SplitConfig;

    struct FlatFitter;

    impl PlaneFitter for FlatFitter {
        fn fit(
            &self,
            points: &[Point3D],
            _config: &FitConfig,
        ) -> std::result::Result<PlaneFit, FitError> {
            Ok(PlaneFit {
                coefficients: PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0),
                inliers: (0..points.len()).collect(),
            })
        }
    }

    fn config(flag: f64) -> AnalysisConfig {
        let mut config = AnalysisConfig {
            voxel: VoxelConfig::disabled(),
            split: SplitConfig::new(0.25),
            ..AnalysisConfig::default()
        };
        config.thresholds.flag = flag;
        config
    }

    fn road(n: usize) -> Vec<Point3D> {
        (0..n)
            .map(|i| {
                // Second quarter alternates between two heights
                let z = if (10..20).contains(&i) && i % 2 == 1 { 8.0 } else { 0.0 };
                Point3D::new(i as f64, 0.0, z)
            })
            .collect()
    }

    #[test]
    fn test_outcome_outlives_config() {
        let outcome = {
            let config = config(1.0);
            Analysis::new(&config).run(road(40), &FlatFitter).unwrap()
        };

        let report = outcome.report();
        assert_eq!(report.flag_threshold, 1.0);
        assert_eq!(report.segments.len(), 4);
        assert_eq!(outcome.flagged(), &outcome.tree().child_ids()[1..2]);
    }

    #[test]
    fn test_outcome_from_temporary_analysis() {
        let outcome = Analysis::new(&config(1.0)).run(road(40), &FlatFitter).unwrap();
        let summary = &outcome.report().segments[1];

        assert!(summary.flagged);
        assert_eq!(summary.range, 10..20);
        assert_eq!(summary.points, 10);
        assert_eq!(summary.inliers, 10);
    }
}
