//! # Samatala: Road-Surface Anomaly Detection
//!
//! Segments a LiDAR point cloud into contiguous runs, fits a plane to each
//! run and flags runs whose points scatter too far from their plane (speed
//! bumps, potholes, debris).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use samatala::{AnalysisConfig, Analysis, RansacPlaneFitter};
//! use samatala::io::read_xyz;
//! use std::path::Path;
//!
//! let config = AnalysisConfig::load_default().unwrap();
//! let points = read_xyz(Path::new("road.xyz")).unwrap();
//!
//! let outcome = Analysis::new(&config)
//!     .run(points, &RansacPlaneFitter::new())
//!     .unwrap();
//! println!("{} anomalous segments", outcome.flagged().len());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Point and statistics primitives
//! - [`config`]: YAML configuration
//! - [`preprocessing`]: Voxel downsampling of the root cloud
//! - [`fitting`]: Plane fitter interface and RANSAC implementation
//! - [`plane`]: Fitted plane with inlier statistics
//! - [`segment`]: Segment tree and partitioning
//! - [`analysis`]: Flagging, range filters, merging and reports
//! - [`io`]: XYZ point files
//!
//! ## Data Flow
//!
//! ```text
//!                  ┌─────────────────┐
//!                  │   Point Cloud   │
//!                  │   (Point3D[])   │
//!                  └────────┬────────┘
//!                           │ voxel_downsample()
//!                           ▼
//!                  ┌─────────────────┐
//!                  │  Root Segment   │──── PlaneFitter
//!                  └────────┬────────┘
//!                           │ Segmenter::ranges()
//!          ┌────────────────┼────────────────┐
//!          ▼                ▼                ▼
//!   ┌────────────┐   ┌────────────┐   ┌────────────┐
//!   │  Child #1  │   │  Child #2  │   │  Child #k  │──── PlaneFitter
//!   └─────┬──────┘   └─────┬──────┘   └─────┬──────┘
//!         └────────────────┼────────────────┘
//!                          ▼
//!                  ┌─────────────────┐
//!                  │     Flagger     │  residual SD > threshold
//!                  └────────┬────────┘
//!                           │
//!              ┌────────────┴────────────┐
//!              ▼                         ▼
//!     ┌────────────────┐        ┌────────────────┐
//!     │ SegmentFilter  │───────▶│     Merger     │──▶ merged points
//!     │ (mean/sd/se)   │        │                │
//!     └────────────────┘        └────────────────┘
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod fitting;
pub mod io;
pub mod plane;
pub mod preprocessing;
pub mod segment;

pub use analysis::{
    Analysis, AnalysisOutcome, AnalysisReport, Flagger, Merger, SegmentFilter, SegmentSummary,
    StatisticKind,
};
pub use config::{AnalysisConfig, ConfigError};
pub use crate::core::{HeightStatistics, Point3D, ValueRange};
pub use error::{AnalysisError, Result};
pub use fitting::{FitConfig, FitError, PlaneFit, PlaneFitter, RansacPlaneFitter};
pub use plane::{Plane, PlaneCoefficients};
pub use segment::{FlagState, Segment, SegmentId, SegmentState, SegmentTree, Segmenter, SplitConfig};
