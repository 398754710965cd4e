//! Error types for segment analysis.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fitting::FitError;
use crate::io::PointIoError;

/// Errors raised while building, flagging, filtering or merging segments.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Caller supplied an argument that cannot be honoured.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A point range with no points was supplied.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The split scale factor yields zero points per child.
    #[error("Degenerate split: scale factor {scale_factor} gives 0 points per segment for {points} points")]
    DegenerateSplit {
        /// Configured scale factor.
        scale_factor: f64,
        /// Point count of the segment being split.
        points: usize,
    },

    /// A merge selected no points.
    #[error("Merge produced no points")]
    EmptyResult,

    /// The plane fitter failed.
    #[error("Plane fitting failed: {0}")]
    Fit(#[from] FitError),

    /// Reading the point source failed.
    #[error("Point input failed: {0}")]
    Io(#[from] PointIoError),

    /// Configuration rejected by validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::DegenerateSplit { .. } => "DEGENERATE_SPLIT",
            Self::EmptyResult => "EMPTY_RESULT",
            Self::Fit(_) => "FIT_FAILED",
            Self::Io(_) => "IO",
            Self::Config(_) => "CONFIG",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::DegenerateSplit {
            scale_factor: 0.001,
            points: 10,
        };
        assert_eq!(
            err.to_string(),
            "Degenerate split: scale factor 0.001 gives 0 points per segment for 10 points"
        );
        assert_eq!(AnalysisError::EmptyResult.to_string(), "Merge produced no points");
    }

    #[test]
    fn test_error_code() {
        assert_eq!(AnalysisError::invalid("kind").code(), "INVALID_ARGUMENT");
        assert_eq!(AnalysisError::empty("range").code(), "EMPTY_INPUT");
        let fit: AnalysisError = FitError::NoConsensus { iterations: 3 }.into();
        assert_eq!(fit.code(), "FIT_FAILED");
    }
}
