//! Segment nodes.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::{HeightStatistics, Point3D, heights, translate_to_origin};
use crate::error::{AnalysisError, Result};
use crate::fitting::{FitConfig, PlaneFitter};
use crate::plane::Plane;

/// Index of a segment in its [`SegmentTree`](super::SegmentTree) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    /// The root always occupies slot 0.
    pub const ROOT: SegmentId = SegmentId(0);

    /// Arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a segment.
///
/// Transitions only move forward. Everything up to `Partitioned`/`Leaf`
/// happens inside construction; `Flagged` is reached by the flag pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SegmentState {
    /// Nothing assigned yet.
    Uninitialized,
    /// Points translated and stored.
    PointsAssigned,
    /// Plane fitted over the points.
    PlaneFitted,
    /// Root with its children realized.
    Partitioned,
    /// Child segment; never partitioned further.
    Leaf,
    /// Flag pass has evaluated this segment.
    Flagged,
}

impl SegmentState {
    /// True if `next` is a legal forward transition from `self`.
    pub fn can_advance_to(self, next: SegmentState) -> bool {
        use SegmentState::*;
        matches!(
            (self, next),
            (Uninitialized, PointsAssigned)
                | (PointsAssigned, PlaneFitted)
                | (PlaneFitted, Partitioned)
                | (PlaneFitted, Leaf)
                | (Leaf, Flagged)
        )
    }

    fn advance(&mut self, next: SegmentState) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal segment transition {:?} -> {:?}",
            self,
            next
        );
        log::trace!("segment state {:?} -> {:?}", self, next);
        *self = next;
    }
}

/// Outcome of the flag pass for one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FlagState {
    /// Flag pass has not run.
    Pending,
    /// Evaluated, within threshold.
    Clear,
    /// Evaluated, residual dispersion above threshold.
    Flagged,
}

/// A node of the segment tree.
///
/// Points are stored in local coordinates: the first point of the segment is
/// `(0, 0, 0)` and [`Segment::origin`] holds the absolute position that was
/// subtracted.
#[derive(Clone, Debug)]
pub struct Segment {
    pub(super) id: SegmentId,
    pub(super) parent: Option<SegmentId>,
    pub(super) children: Vec<SegmentId>,
    source_range: Range<usize>,
    origin: Point3D,
    points: Vec<Point3D>,
    plane: Plane,
    state: SegmentState,
    flag: FlagState,
}

impl Segment {
    /// Construct the root over an already downsampled, absolute point set.
    ///
    /// The returned segment has no children yet; the tree attaches them and
    /// marks it partitioned.
    pub(super) fn root(
        points: Vec<Point3D>,
        fitter: &dyn PlaneFitter,
        fit: &FitConfig,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(AnalysisError::empty("root segment requires at least one point"));
        }
        let range = 0..points.len();
        Self::assemble(None, range, &points, Point3D::ZERO, fitter, fit)
    }

    /// Construct a leaf over `range` of `parent`'s points.
    ///
    /// Fails with [`AnalysisError::InvalidArgument`] when `parent` is absent
    /// or is not the root, and [`AnalysisError::EmptyInput`] when `range`
    /// selects no points. The tree assigns the real id afterwards.
    pub(super) fn child(
        parent: Option<&Segment>,
        range: Range<usize>,
        fitter: &dyn PlaneFitter,
        fit: &FitConfig,
    ) -> Result<Self> {
        let parent = parent.ok_or_else(|| {
            AnalysisError::invalid("a child segment requires a parent reference")
        })?;
        if !parent.is_root() {
            return Err(AnalysisError::invalid(format!(
                "segment {} is a leaf and cannot be partitioned",
                parent.id
            )));
        }
        if range.is_empty() {
            return Err(AnalysisError::empty(format!(
                "child range {:?} of segment {} selects no points",
                range, parent.id
            )));
        }
        if range.end > parent.points.len() {
            return Err(AnalysisError::invalid(format!(
                "child range {:?} exceeds parent {} with {} points",
                range,
                parent.id,
                parent.points.len()
            )));
        }

        let run = &parent.points[range.clone()];
        Self::assemble(Some(parent.id), range, run, parent.origin, fitter, fit)
    }

    /// Points → plane, as one step.
    fn assemble(
        parent: Option<SegmentId>,
        source_range: Range<usize>,
        run: &[Point3D],
        frame_origin: Point3D,
        fitter: &dyn PlaneFitter,
        fit: &FitConfig,
    ) -> Result<Self> {
        let mut state = SegmentState::Uninitialized;

        let first = run[0];
        let origin = frame_origin + first;
        let points = translate_to_origin(run, first);
        state.advance(SegmentState::PointsAssigned);
        log::debug!(
            "Origin ({:.3}, {:.3}, {:.3}) for {} points",
            origin.x,
            origin.y,
            origin.z,
            points.len()
        );

        let plane = Plane::from_fit(&points, fitter.fit(&points, fit)?)?;
        state.advance(SegmentState::PlaneFitted);
        log::debug!("Generated plane: {}", plane);

        let mut segment = Self {
            id: SegmentId::ROOT,
            parent,
            children: Vec::new(),
            source_range,
            origin,
            points,
            plane,
            state,
            flag: FlagState::Pending,
        };
        if parent.is_some() {
            segment.state.advance(SegmentState::Leaf);
        }
        Ok(segment)
    }

    pub(super) fn mark_partitioned(&mut self) {
        self.state.advance(SegmentState::Partitioned);
    }

    /// Record the flag pass outcome. Allowed once.
    pub(crate) fn record_flag(&mut self, flagged: bool) -> Result<()> {
        if self.flag != FlagState::Pending {
            return Err(AnalysisError::invalid(format!(
                "segment {} has already been through a flag pass",
                self.id
            )));
        }
        self.flag = if flagged {
            FlagState::Flagged
        } else {
            FlagState::Clear
        };
        self.state.advance(SegmentState::Flagged);
        Ok(())
    }

    /// Arena id.
    #[inline]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Parent id; `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<SegmentId> {
        self.parent
    }

    /// True for the root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Child ids in range order. Empty for leaves.
    #[inline]
    pub fn children(&self) -> &[SegmentId] {
        &self.children
    }

    /// Index range this segment was drawn from in its parent.
    #[inline]
    pub fn source_range(&self) -> Range<usize> {
        self.source_range.clone()
    }

    /// Absolute position of the first point; local coordinates are relative to it.
    #[inline]
    pub fn origin(&self) -> Point3D {
        self.origin
    }

    /// Points in local coordinates.
    #[inline]
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; segments are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fitted plane (local coordinates).
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Flag pass outcome.
    #[inline]
    pub fn flag_state(&self) -> FlagState {
        self.flag
    }

    /// True once the flag pass marked this segment anomalous. False before.
    #[inline]
    pub fn flagged(&self) -> bool {
        self.flag == FlagState::Flagged
    }

    /// Height statistics of all the segment's points (not just inliers).
    pub fn point_statistics(&self) -> Option<HeightStatistics> {
        HeightStatistics::from_values(&heights(&self.points))
    }

    /// Plane inliers shifted back to absolute coordinates.
    pub fn absolute_inliers(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.plane.inliers().iter().map(move |&p| p + self.origin)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segment {}: is root: {}; children: {}; points: {}; plane: {}",
            self.id,
            self.is_root(),
            self.children.len(),
            self.points.len(),
            self.plane
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::{FitError, PlaneFit};
    use crate::plane::PlaneCoefficients;

    /// Horizontal plane, every point an inlier.
    struct FlatFitter;

    impl PlaneFitter for FlatFitter {
        fn fit(&self, points: &[Point3D], _config: &FitConfig) -> std::result::Result<PlaneFit, FitError> {
            Ok(PlaneFit {
                coefficients: PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0),
                inliers: (0..points.len()).collect(),
            })
        }
    }

    fn line(n: usize, offset: f64) -> Vec<Point3D> {
        (0..n)
            .map(|i| Point3D::new(offset + i as f64, 2.0 * i as f64, 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_root_translates_to_local_origin() {
        let root = Segment::root(line(5, 10.0), &FlatFitter, &FitConfig::default()).unwrap();
        assert!(root.is_root());
        assert_eq!(root.points()[0], Point3D::ZERO);
        assert_eq!(root.origin(), Point3D::new(10.0, 0.0, 100.0));
        assert_eq!(root.state(), SegmentState::PlaneFitted);
        assert!(!root.flagged());
    }

    #[test]
    fn test_root_requires_points() {
        let err = Segment::root(Vec::new(), &FlatFitter, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }

    #[test]
    fn test_child_has_its_own_origin() {
        let root = Segment::root(line(10, 10.0), &FlatFitter, &FitConfig::default()).unwrap();
        let child = Segment::child(Some(&root), 4..8, &FlatFitter, &FitConfig::default()).unwrap();

        assert_eq!(child.parent(), Some(SegmentId::ROOT));
        assert_eq!(child.len(), 4);
        assert_eq!(child.points()[0], Point3D::ZERO);
        assert_eq!(child.points()[3], Point3D::new(3.0, 6.0, 3.0));
        // Absolute position of original point 4
        assert_eq!(child.origin(), Point3D::new(14.0, 8.0, 104.0));
        assert_eq!(child.state(), SegmentState::Leaf);
        assert_eq!(child.source_range(), 4..8);
    }

    #[test]
    fn test_child_requires_parent() {
        let err = Segment::child(None, 0..3, &FlatFitter, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
    }

    #[test]
    fn test_leaf_cannot_be_a_parent() {
        let root = Segment::root(line(8, 0.0), &FlatFitter, &FitConfig::default()).unwrap();
        let leaf = Segment::child(Some(&root), 0..6, &FlatFitter, &FitConfig::default()).unwrap();

        let err = Segment::child(Some(&leaf), 0..3, &FlatFitter, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_child_rejects_empty_range() {
        let root = Segment::root(line(4, 0.0), &FlatFitter, &FitConfig::default()).unwrap();
        let err = Segment::child(Some(&root), 2..2, &FlatFitter, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }

    #[test]
    fn test_child_rejects_out_of_bounds_range() {
        let root = Segment::root(line(4, 0.0), &FlatFitter, &FitConfig::default()).unwrap();
        let err = Segment::child(Some(&root), 2..9, &FlatFitter, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
    }

    #[test]
    fn test_flag_recorded_once() {
        let root = Segment::root(line(4, 0.0), &FlatFitter, &FitConfig::default()).unwrap();
        let mut child = Segment::child(Some(&root), 0..4, &FlatFitter, &FitConfig::default()).unwrap();

        assert_eq!(child.flag_state(), FlagState::Pending);
        child.record_flag(true).unwrap();
        assert!(child.flagged());
        assert_eq!(child.state(), SegmentState::Flagged);
        assert!(child.record_flag(false).is_err());
        assert!(child.flagged());
    }

    #[test]
    fn test_state_transitions_are_forward_only() {
        use SegmentState::*;
        assert!(Uninitialized.can_advance_to(PointsAssigned));
        assert!(PlaneFitted.can_advance_to(Leaf));
        assert!(Leaf.can_advance_to(Flagged));
        assert!(!Flagged.can_advance_to(Leaf));
        assert!(!Partitioned.can_advance_to(Flagged));
        assert!(!PlaneFitted.can_advance_to(PointsAssigned));
    }

    #[test]
    fn test_absolute_inliers() {
        let root = Segment::root(line(3, 5.0), &FlatFitter, &FitConfig::default()).unwrap();
        let absolute: Vec<Point3D> = root.absolute_inliers().collect();
        assert_eq!(absolute, line(3, 5.0));
    }
}
