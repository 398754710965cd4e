//! Configuration for plane fitting.

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Parameters handed to a [`PlaneFitter`](super::PlaneFitter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Maximum point-to-plane distance for a point to count as an inlier.
    /// Same units as the point cloud.
    /// Default: 175.0
    #[serde(default = "defaults::distance_threshold")]
    pub distance_threshold: f64,

    /// Points drawn per hypothesis. Three gives an exact plane; more
    /// gives a least-squares plane through the sample.
    /// Default: 3
    #[serde(default = "defaults::sample_size")]
    pub sample_size: usize,

    /// Number of hypotheses evaluated.
    /// Default: 150
    #[serde(default = "defaults::iterations")]
    pub iterations: usize,

    /// Random seed for reproducibility.
    /// 0 = use an entropy-based seed (non-deterministic).
    /// Default: 0
    #[serde(default)]
    pub seed: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            distance_threshold: defaults::distance_threshold(),
            sample_size: defaults::sample_size(),
            iterations: defaults::iterations(),
            seed: 0,
        }
    }
}

impl FitConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the inlier distance threshold.
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Builder-style setter for the sample size.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Builder-style setter for iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder-style setter for random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
