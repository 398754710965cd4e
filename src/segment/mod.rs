//! Segment tree construction.
//!
//! The root segment holds the whole (downsampled) cloud. It is partitioned
//! into contiguous children of `floor(scale_factor × N)` points each, and
//! every segment gets its own local origin and fitted plane.
//!
//! ```text
//!             root  (N points, origin = first point)
//!   ┌──────────┬──────────┬─────┬──────────┐
//!   ▼          ▼          ▼     ▼          ▼
//! child #1   child #2   ...   child #k   (last may be short)
//! [0, S)     [S, 2S)          [(k-1)S, N)
//! ```
//!
//! Segments live in an arena owned by [`SegmentTree`]; parent links are ids,
//! not references.
//!
//! ```rust,ignore
//! use samatala::config::AnalysisConfig;
//! use samatala::fitting::RansacPlaneFitter;
//! use samatala::segment::SegmentTree;
//!
//! let tree = SegmentTree::builder()
//!     .path("road.xyz")
//!     .build(&AnalysisConfig::default(), &RansacPlaneFitter::new())?;
//! for child in tree.children() {
//!     println!("{}", child.plane());
//! }
//! ```

mod node;
mod segmenter;
mod tree;

pub use node::{FlagState, Segment, SegmentId, SegmentState};
pub use segmenter::{Segmenter, SplitConfig};
pub use tree::{SegmentTree, SegmentTreeBuilder};
