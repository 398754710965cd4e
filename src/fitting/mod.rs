//! Plane fitting.
//!
//! The segment tree never fits planes itself. It asks a [`PlaneFitter`] for
//! coefficients and inlier indices and turns them into a
//! [`Plane`](crate::plane::Plane). This keeps the randomized numerics out of
//! the analysis and lets tests inject a deterministic fitter.
//!
//! [`RansacPlaneFitter`] is the production implementation.

mod config;
mod ransac;
mod traits;

use thiserror::Error;

pub use config::FitConfig;
pub use ransac::RansacPlaneFitter;
pub use traits::{PlaneFit, PlaneFitter};

/// Errors reported by a plane fitter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Not enough points to draw a single sample.
    #[error("need at least {required} points to fit a plane, got {found}")]
    InsufficientPoints {
        /// Points supplied.
        found: usize,
        /// Points required by the sample size.
        required: usize,
    },

    /// Every hypothesis was degenerate (collinear or vertical samples).
    #[error("no valid plane hypothesis after {iterations} iterations")]
    NoConsensus {
        /// Iterations attempted.
        iterations: usize,
    },

    /// The fitter reported an inlier index outside the point set.
    #[error("inlier index {index} out of range for {len} points")]
    InlierOutOfRange {
        /// Offending index.
        index: usize,
        /// Size of the fitted point set.
        len: usize,
    },

    /// The fitter reported the same inlier index more than once.
    #[error("inlier index {index} reported more than once")]
    DuplicateInlier {
        /// Repeated index.
        index: usize,
    },
}
