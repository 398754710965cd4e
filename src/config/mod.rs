//! Configuration loading for samatala.
//!
//! All settings live in one YAML file. Every field has a default, so a
//! partial file (or no file at all) is valid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use samatala::config::AnalysisConfig;
//!
//! // Load from configs/samatala.yaml, or built-in defaults if absent
//! let config = AnalysisConfig::load_default()?;
//!
//! // Or parse directly
//! let config = AnalysisConfig::from_yaml("split:\n  scale_factor: 0.01\n")?;
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `voxel` | Root downsampling voxel size |
//! | `fit` | Plane fitter distance threshold, sample size, iterations, seed |
//! | `split` | Child partition scale factor, parallel fitting |
//! | [`ThresholdSection`] | Flag threshold, mean/SD/SE open ranges |
//!
//! ## Example YAML
//!
//! ```yaml
//! voxel:
//!   size: 1000.0            # 0 disables downsampling
//! fit:
//!   distance_threshold: 175.0
//!   sample_size: 3
//!   iterations: 150
//! split:
//!   scale_factor: 0.003     # points per child = floor(0.003 * N)
//! thresholds:
//!   flag: 430.0             # residual SD strictly above this flags
//!   sd: { lower: 430.0, upper: 435.0 }
//!   se: { lower: 1.8, upper: 2.3 }
//! ```

pub(crate) mod defaults;
mod analysis;
mod error;
mod thresholds;

pub use analysis::{AnalysisConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigError;
pub use thresholds::ThresholdSection;
