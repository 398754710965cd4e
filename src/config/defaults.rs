//! Default value functions for serde deserialization.

use crate::core::ValueRange;

pub fn voxel_size() -> f64 {
    1e3
}

pub fn distance_threshold() -> f64 {
    175.0
}

pub fn sample_size() -> usize {
    3
}

pub fn iterations() -> usize {
    150
}

pub fn scale_factor() -> f64 {
    3e-3
}

pub fn flag_threshold() -> f64 {
    430.0
}

pub fn mean_range() -> ValueRange {
    ValueRange::new(-1e6, 1e6)
}

pub fn sd_range() -> ValueRange {
    ValueRange::new(430.0, 435.0)
}

pub fn se_range() -> ValueRange {
    ValueRange::new(1.8, 2.3)
}
