//! Core types for the samatala analysis library.
//!
//! - [`Point3D`]: a LiDAR return
//! - [`ValueRange`]: exclusive bound pair for statistic thresholds
//! - [`stats`]: mean/variance/SD/SE helpers

mod point;
mod range;

pub mod stats;

pub use point::{Point3D, heights, translate_to_origin};
pub use range::ValueRange;
pub use stats::HeightStatistics;
