//! Range filters over plane statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ThresholdSection;
use crate::core::ValueRange;
use crate::error::{AnalysisError, Result};
use crate::plane::Plane;
use crate::segment::{Segment, SegmentTree};

/// Plane statistic a filter compares against its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticKind {
    /// Mean inlier height
    Mean,
    /// Sample SD of inlier heights
    Sd,
    /// Standard error of the mean inlier height
    Se,
}

impl StatisticKind {
    /// All kinds, in configuration order.
    pub const ALL: [StatisticKind; 3] = [Self::Mean, Self::Sd, Self::Se];

    /// Name used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sd => "sd",
            Self::Se => "se",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "sd" => Ok(Self::Sd),
            "se" => Ok(Self::Se),
            other => Err(AnalysisError::invalid(format!(
                "unknown filter kind '{}' (expected mean, sd or se)",
                other
            ))),
        }
    }
}

/// Selects root children whose plane statistic lies strictly inside a range.
#[derive(Clone, Debug)]
pub struct SegmentFilter {
    mean: ValueRange,
    sd: ValueRange,
    se: ValueRange,
}

impl SegmentFilter {
    /// Create a filter from the threshold section.
    pub fn new(thresholds: &ThresholdSection) -> Self {
        Self {
            mean: thresholds.mean,
            sd: thresholds.sd,
            se: thresholds.se,
        }
    }

    /// Bound pair used for `kind`.
    pub fn range(&self, kind: StatisticKind) -> ValueRange {
        match kind {
            StatisticKind::Mean => self.mean,
            StatisticKind::Sd => self.sd,
            StatisticKind::Se => self.se,
        }
    }

    /// Value of `kind` for a plane. `None` when the plane has no inliers.
    pub fn statistic(kind: StatisticKind, plane: &Plane) -> Option<f64> {
        let stats = plane.statistics()?;
        Some(match kind {
            StatisticKind::Mean => stats.mean,
            StatisticKind::Sd => stats.standard_deviation,
            StatisticKind::Se => stats.standard_error,
        })
    }

    /// True if the plane's statistic is strictly inside the range for `kind`.
    pub fn accepts(&self, kind: StatisticKind, plane: &Plane) -> bool {
        Self::statistic(kind, plane).is_some_and(|v| self.range(kind).contains(v))
    }

    /// Root children accepted for `kind`, in original order.
    pub fn filter<'t>(&self, tree: &'t SegmentTree, kind: StatisticKind) -> Vec<&'t Segment> {
        let selected: Vec<&Segment> = tree
            .children()
            .filter(|s| self.accepts(kind, s.plane()))
            .collect();

        log::debug!(
            "Filter {} {:?}: {} of {} segments",
            kind,
            self.range(kind),
            selected.len(),
            tree.child_count()
        );
        selected
    }

    /// [`filter`](Self::filter) with the kind given by name.
    ///
    /// Unknown names fail with [`AnalysisError::InvalidArgument`].
    pub fn filter_named<'t>(&self, tree: &'t SegmentTree, kind: &str) -> Result<Vec<&'t Segment>> {
        Ok(self.filter(tree, kind.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point3D;
    use crate::plane::PlaneCoefficients;

    fn plane(heights: &[f64]) -> Plane {
        let inliers = heights
            .iter()
            .enumerate()
            .map(|(i, &z)| Point3D::new(i as f64, 0.0, z))
            .collect();
        Plane::new(PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0), inliers).unwrap()
    }

    fn filter(sd: (f64, f64)) -> SegmentFilter {
        SegmentFilter::new(&ThresholdSection {
            sd: sd.into(),
            ..ThresholdSection::default()
        })
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("mean".parse::<StatisticKind>().unwrap(), StatisticKind::Mean);
        assert_eq!("sd".parse::<StatisticKind>().unwrap(), StatisticKind::Sd);
        assert_eq!("se".parse::<StatisticKind>().unwrap(), StatisticKind::Se);
        for bad in ["SD", "median", ""] {
            let err = bad.parse::<StatisticKind>().unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidArgument(_)));
        }
        for kind in StatisticKind::ALL {
            assert_eq!(kind.to_string().parse::<StatisticKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_bounds_are_exclusive() {
        // Sample SD of [0, 2] is sqrt(2)
        let p = plane(&[0.0, 2.0]);
        let sd = 2.0_f64.sqrt();

        assert!(filter((sd - 0.1, sd + 0.1)).accepts(StatisticKind::Sd, &p));
        assert!(!filter((sd, sd + 0.1)).accepts(StatisticKind::Sd, &p));
        assert!(!filter((sd - 0.1, sd)).accepts(StatisticKind::Sd, &p));
    }

    #[test]
    fn test_statistic_values() {
        let p = plane(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sd = 2.5_f64.sqrt();
        assert_eq!(SegmentFilter::statistic(StatisticKind::Mean, &p), Some(3.0));
        assert_eq!(SegmentFilter::statistic(StatisticKind::Sd, &p), Some(sd));
        assert_eq!(
            SegmentFilter::statistic(StatisticKind::Se, &p),
            Some(sd / 5.0_f64.sqrt())
        );
    }

    #[test]
    fn test_planes_without_inliers_are_excluded() {
        let empty = Plane::new(PlaneCoefficients::new(0.0, 0.0, 1.0, 0.0), Vec::new()).unwrap();
        let f = SegmentFilter::new(&ThresholdSection {
            mean: (f64::MIN, f64::MAX).into(),
            ..ThresholdSection::default()
        });
        assert!(SegmentFilter::statistic(StatisticKind::Mean, &empty).is_none());
        assert!(!f.accepts(StatisticKind::Mean, &empty));
    }
}
