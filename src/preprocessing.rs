//! Point cloud preprocessing.
//!
//! Voxel-grid downsampling applied once to the root point set before
//! segmentation.
//!
//! # Example
//!
//! ```rust
//! use samatala::core::Point3D;
//! use samatala::preprocessing::voxel_downsample;
//!
//! let cloud = vec![
//!     Point3D::new(0.1, 0.1, 0.0),
//!     Point3D::new(0.3, 0.2, 0.0), // same 1.0 voxel as the first point
//!     Point3D::new(5.0, 5.0, 1.0),
//! ];
//!
//! let reduced = voxel_downsample(&cloud, 1.0);
//! assert_eq!(reduced.len(), 2);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::Point3D;

/// Configuration for root voxel downsampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelConfig {
    /// Voxel edge length, in point cloud units.
    /// Set to 0.0 to disable downsampling.
    /// Default: 1000.0
    #[serde(default = "defaults::voxel_size")]
    pub size: f64,
}

impl Default for VoxelConfig {
    fn default() -> Self {
        Self {
            size: defaults::voxel_size(),
        }
    }
}

impl VoxelConfig {
    /// Create a config with the given voxel size.
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Disabled downsampling.
    pub fn disabled() -> Self {
        Self { size: 0.0 }
    }

    /// True if downsampling will change the cloud.
    pub fn is_enabled(&self) -> bool {
        self.size > 0.0
    }
}

/// Running centroid of one voxel.
#[derive(Clone, Copy)]
struct VoxelAccumulator {
    sum: Point3D,
    count: usize,
}

/// Downsample a cloud by replacing all points in each voxel with their centroid.
///
/// The grid is anchored at the cloud's minimum corner. Output order follows
/// the first point that landed in each voxel, so the result keeps the
/// ordering of the input. A non-positive `voxel_size` returns the cloud
/// unchanged.
///
/// # Complexity
///
/// O(n) with one hash lookup per point.
pub fn voxel_downsample(points: &[Point3D], voxel_size: f64) -> Vec<Point3D> {
    if !(voxel_size > 0.0) || points.is_empty() {
        return points.to_vec();
    }

    let min = points.iter().fold(
        Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        |m, p| Point3D::new(m.x.min(p.x), m.y.min(p.y), m.z.min(p.z)),
    );

    let voxel_key = |p: &Point3D| -> (i64, i64, i64) {
        (
            ((p.x - min.x) / voxel_size).floor() as i64,
            ((p.y - min.y) / voxel_size).floor() as i64,
            ((p.z - min.z) / voxel_size).floor() as i64,
        )
    };

    let mut slots: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut voxels: Vec<VoxelAccumulator> = Vec::new();

    for p in points {
        let slot = *slots.entry(voxel_key(p)).or_insert_with(|| {
            voxels.push(VoxelAccumulator {
                sum: Point3D::ZERO,
                count: 0,
            });
            voxels.len() - 1
        });

        let voxel = &mut voxels[slot];
        voxel.sum = voxel.sum + *p;
        voxel.count += 1;
    }

    voxels
        .into_iter()
        .map(|v| {
            let n = v.count as f64;
            Point3D::new(v.sum.x / n, v.sum.y / n, v.sum.z / n)
        })
        .collect()
}
