//! Arena-backed segment tree.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::core::Point3D;
use crate::error::{AnalysisError, Result};
use crate::fitting::{FitConfig, PlaneFitter};
use crate::io::read_xyz;
use crate::preprocessing::voxel_downsample;

use super::node::{Segment, SegmentId};
use super::segmenter::Segmenter;

/// Two-level segment tree: a root and its ordered children.
///
/// Segments live in one arena. The root sits at [`SegmentId::ROOT`] and owns
/// its children through their ids; a child's parent id is a lookup only.
#[derive(Clone, Debug)]
pub struct SegmentTree {
    segments: Vec<Segment>,
    split_size: usize,
}

impl SegmentTree {
    /// Start building a tree from a point file or an in-memory point set.
    pub fn builder() -> SegmentTreeBuilder {
        SegmentTreeBuilder::default()
    }

    /// Build a tree over `points` (shorthand for the builder's points mode).
    pub fn from_points(
        points: Vec<Point3D>,
        config: &AnalysisConfig,
        fitter: &dyn PlaneFitter,
    ) -> Result<Self> {
        Self::builder().points(points).build(config, fitter)
    }

    /// The root segment.
    #[inline]
    pub fn root(&self) -> &Segment {
        &self.segments[SegmentId::ROOT.index()]
    }

    /// Look up a segment by id.
    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id.index())
    }

    /// Parent of a segment. `None` for the root or an unknown id.
    pub fn parent_of(&self, id: SegmentId) -> Option<&Segment> {
        self.get(id)?.parent().and_then(|p| self.get(p))
    }

    /// Children of the root in range order.
    pub fn children(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.root()
            .children()
            .iter()
            .filter_map(move |&id| self.get(id))
    }

    /// Ids of the root's children in range order.
    pub fn child_ids(&self) -> &[SegmentId] {
        self.root().children()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.root().children().len()
    }

    /// Total number of segments, root included.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Points per child used when partitioning the root.
    pub fn split_size(&self) -> usize {
        self.split_size
    }

    /// Every segment, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter()
    }
}

/// Builder selecting the root's point source.
///
/// Exactly one of [`path`](Self::path) or [`points`](Self::points) must be
/// supplied.
#[derive(Clone, Debug, Default)]
pub struct SegmentTreeBuilder {
    path: Option<PathBuf>,
    points: Option<Vec<Point3D>>,
}

impl SegmentTreeBuilder {
    /// Read the root points from an XYZ file.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use an existing point set for the root.
    pub fn points(mut self, points: Vec<Point3D>) -> Self {
        self.points = Some(points);
        self
    }

    /// Build the tree: downsample, fit the root, partition, fit every child.
    pub fn build(self, config: &AnalysisConfig, fitter: &dyn PlaneFitter) -> Result<SegmentTree> {
        config.validate()?;

        let raw = match (self.path, self.points) {
            (Some(_), Some(_)) => {
                return Err(AnalysisError::invalid(
                    "a source path and a point set cannot both be supplied",
                ));
            }
            (None, None) => {
                return Err(AnalysisError::invalid(
                    "either a source path or a point set is required",
                ));
            }
            (Some(path), None) => read_xyz(&path)?,
            (None, Some(points)) => points,
        };

        log::info!("Creating root segment from {} points", raw.len());
        let points = if config.voxel.is_enabled() {
            let reduced = voxel_downsample(&raw, config.voxel.size);
            log::info!(
                "Downsampled {} points to {} with voxel size {}",
                raw.len(),
                reduced.len(),
                config.voxel.size
            );
            reduced
        } else {
            raw
        };

        let mut root = Segment::root(points, fitter, &config.fit)?;

        let segmenter = Segmenter::new(&config.split);
        let split_size = segmenter.split_size(root.len())?;
        let ranges = segmenter.ranges(root.len())?;
        log::info!(
            "Segmenting {} points into {} children of {}",
            root.len(),
            ranges.len(),
            split_size
        );

        let built = build_children(&root, ranges, fitter, &config.fit, config.split.parallel);
        let (mut segments, child_ids) = number_children(built)?;

        root.children = child_ids;
        root.mark_partitioned();
        segments.insert(SegmentId::ROOT.index(), root);

        let tree = SegmentTree {
            segments,
            split_size,
        };
        log::info!("Segment tree ready: {}", tree.root());
        Ok(tree)
    }
}

type ChildResult = (Range<usize>, Result<Segment>);

/// Fit children in range order. Results stay in input order even when the
/// fits run on the rayon pool.
fn build_children(
    root: &Segment,
    ranges: Vec<Range<usize>>,
    fitter: &dyn PlaneFitter,
    fit: &FitConfig,
    parallel: bool,
) -> Vec<ChildResult> {
    let build = |range: Range<usize>| -> ChildResult {
        log::debug!("Splitting points from {} to {}", range.start, range.end);
        let child = Segment::child(Some(root), range.clone(), fitter, fit);
        (range, child)
    };

    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return ranges.into_par_iter().map(build).collect();
    }

    #[cfg(not(feature = "parallel"))]
    if parallel {
        log::warn!("split.parallel is set but samatala was built without the `parallel` feature");
    }

    ranges.into_iter().map(build).collect()
}

/// Give surviving children contiguous ids starting after the root.
///
/// Empty children are skipped with a warning; any other failure aborts.
fn number_children(built: Vec<ChildResult>) -> Result<(Vec<Segment>, Vec<SegmentId>)> {
    let mut segments = Vec::with_capacity(built.len() + 1);
    let mut child_ids = Vec::with_capacity(built.len());
    for (range, result) in built {
        match result {
            Ok(mut child) => {
                let id = SegmentId(child_ids.len() + 1);
                child.id = id;
                child_ids.push(id);
                segments.push(child);
            }
            Err(AnalysisError::EmptyInput(reason)) => {
                log::warn!("Skipping child {:?}: {}", range, reason);
            }
            Err(e) => return Err(e),
        }
    }
    Ok((segments, child_ids))
}
