//! Point file input and output.
//!
//! Binary LAS decoding is left to external tooling; this module reads and
//! writes the plain `x y z` text exports those tools produce, so a parsed
//! cloud can be fed to the analysis and merged results written back out.

mod xyz;

use thiserror::Error;

pub use xyz::{parse_xyz, read_xyz, write_xyz, write_xyz_to};

/// Error type for point file operations
#[derive(Error, Debug)]
pub enum PointIoError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed as a point
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}
