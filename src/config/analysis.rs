//! Main AnalysisConfig, loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fitting::FitConfig;
use crate::preprocessing::VoxelConfig;
use crate::segment::SplitConfig;

use super::error::ConfigError;
use super::thresholds::ThresholdSection;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/samatala.yaml";

/// Full analysis configuration loaded from YAML.
///
/// Passed by reference into every stage; never mutated during a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Root downsampling
    #[serde(default)]
    pub voxel: VoxelConfig,

    /// Plane fitting parameters
    #[serde(default)]
    pub fit: FitConfig,

    /// Child partitioning
    #[serde(default)]
    pub split: SplitConfig,

    /// Flag threshold and range filters
    #[serde(default)]
    pub thresholds: ThresholdSection,
}

impl AnalysisConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from the default config path, falling back to built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every value against its legal domain.
    ///
    /// Zero is accepted wherever it is meaningful (voxel size 0 disables
    /// downsampling, a flag threshold of 0 flags any non-flat segment).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.voxel.size;
        if !size.is_finite() || size < 0.0 {
            return Err(ConfigError::invalid(
                "voxel.size",
                format!("must be finite and >= 0, got {}", size),
            ));
        }

        let threshold = self.fit.distance_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "fit.distance_threshold",
                format!("must be finite and > 0, got {}", threshold),
            ));
        }
        if self.fit.sample_size < 3 {
            return Err(ConfigError::invalid(
                "fit.sample_size",
                format!("a plane needs at least 3 points, got {}", self.fit.sample_size),
            ));
        }
        if self.fit.iterations == 0 {
            return Err(ConfigError::invalid("fit.iterations", "must be at least 1"));
        }

        let scale = self.split.scale_factor;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(ConfigError::invalid(
                "split.scale_factor",
                format!("must be in (0, 1], got {}", scale),
            ));
        }

        let t = &self.thresholds;
        if !t.flag.is_finite() {
            return Err(ConfigError::invalid("thresholds.flag", "must be finite"));
        }
        for (field, range) in [
            ("thresholds.mean", t.mean),
            ("thresholds.sd", t.sd),
            ("thresholds.se", t.se),
        ] {
            if !range.is_well_formed() {
                return Err(ConfigError::invalid(
                    field,
                    format!(
                        "bounds must be finite with lower <= upper, got ({}, {})",
                        range.lower, range.upper
                    ),
                ));
            }
        }

        Ok(())
    }
}
