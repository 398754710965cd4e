//! Flagging, filtering and merging over a built segment tree.
//!
//! # Two dispersions
//!
//! - [`Flagger`] compares the **residual SD** of each child (population SD
//!   of `z − plane.z(x, y)` over its inliers) against one threshold.
//! - [`SegmentFilter`] compares the **inlier height** mean, SD or SE against
//!   an open range.
//!
//! [`Merger`]'s default selection uses a third value, the height SD of all
//! of a segment's points.
//!
//! ```rust,ignore
//! use samatala::analysis::{Analysis, StatisticKind};
//!
//! let outcome = Analysis::new(&config).run(points, &RansacPlaneFitter::new())?;
//! for id in outcome.flagged() {
//!     println!("anomaly at {:?}", outcome.tree().get(*id).map(|s| s.origin()));
//! }
//! let export = outcome.merged(Some(StatisticKind::Sd))?;
//! ```

mod filter;
mod flagger;
mod merger;
mod pipeline;

pub use filter::{SegmentFilter, StatisticKind};
pub use flagger::Flagger;
pub use merger::Merger;
pub use pipeline::{Analysis, AnalysisOutcome, AnalysisReport, SegmentSummary};
