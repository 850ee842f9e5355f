use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::Coord;
use crate::error::{MapError, MapResult};

/// Axis-aligned view box `(min1, min2, max1, max2)` in domain units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min1: f64,
    pub min2: f64,
    pub max1: f64,
    pub max2: f64,
}

impl Extent {
    pub fn new(min1: f64, min2: f64, max1: f64, max2: f64) -> MapResult<Self> {
        let extent = Self {
            min1,
            min2,
            max1,
            max2,
        };
        extent.validate()?;
        Ok(extent)
    }

    /// Square box spanning `span` on both axes around `center`.
    pub fn centered(center: Coord, span: f64) -> MapResult<Self> {
        if !span.is_finite() || span <= 0.0 {
            return Err(MapError::InvalidData(
                "field of view span must be finite and > 0".to_owned(),
            ));
        }
        let half = span / 2.0;
        Self::new(
            center.axis1 - half,
            center.axis2 - half,
            center.axis1 + half,
            center.axis2 + half,
        )
    }

    pub fn validate(self) -> MapResult<()> {
        for (name, value) in [
            ("min1", self.min1),
            ("min2", self.min2),
            ("max1", self.max1),
            ("max2", self.max2),
        ] {
            if !value.is_finite() {
                return Err(MapError::InvalidData(format!(
                    "extent bound `{name}` must be finite"
                )));
            }
        }
        if self.max1 <= self.min1 || self.max2 <= self.min2 {
            return Err(MapError::InvalidData(
                "extent must have strictly positive area".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max1 - self.min1
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.max2 - self.min2
    }

    #[must_use]
    pub fn center(self) -> Coord {
        Coord::new(
            (self.min1 + self.max1) / 2.0,
            (self.min2 + self.max2) / 2.0,
        )
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(self, point: Coord) -> bool {
        (self.min1..=self.max1).contains(&point.axis1)
            && (self.min2..=self.max2).contains(&point.axis2)
    }

    #[must_use]
    pub fn contains_extent(self, other: Extent) -> bool {
        self.min1 <= other.min1
            && self.min2 <= other.min2
            && self.max1 >= other.max1
            && self.max2 >= other.max2
    }

    /// Closed outline `min/min -> max/min -> max/max -> min/max -> min/min`.
    #[must_use]
    pub fn outline(self) -> [Coord; 5] {
        [
            Coord::new(self.min1, self.min2),
            Coord::new(self.max1, self.min2),
            Coord::new(self.max1, self.max2),
            Coord::new(self.min1, self.max2),
            Coord::new(self.min1, self.min2),
        ]
    }
}

/// Bounding-box-with-margin calculator for data-driven (geographic) views.
///
/// Each axis grows by `range * margin_percent / 100` on both sides; the
/// per-side margin never drops below `min_margin`, so a single point or a
/// set of identical points still yields a box with positive area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentCalculator {
    pub margin_percent: f64,
    pub min_margin: f64,
}

impl ExtentCalculator {
    pub const PATH_MAP_MARGIN_PERCENT: f64 = 10.0;
    pub const PATH_MAP_MIN_MARGIN: f64 = 0.1;
    pub const OCCULTATION_MARGIN_PERCENT: f64 = 15.0;
    pub const OCCULTATION_MIN_MARGIN: f64 = 0.5;

    #[must_use]
    pub fn new(margin_percent: f64, min_margin: f64) -> Self {
        Self {
            margin_percent,
            min_margin,
        }
    }

    #[must_use]
    pub fn path_map() -> Self {
        Self::new(Self::PATH_MAP_MARGIN_PERCENT, Self::PATH_MAP_MIN_MARGIN)
    }

    #[must_use]
    pub fn occultation() -> Self {
        Self::new(
            Self::OCCULTATION_MARGIN_PERCENT,
            Self::OCCULTATION_MIN_MARGIN,
        )
    }

    #[must_use]
    pub fn with_margin_percent(mut self, margin_percent: f64) -> Self {
        self.margin_percent = margin_percent;
        self
    }

    /// Computes the padded bounding box of `points`.
    ///
    /// Non-finite coordinates are ignored. With no usable point the box is
    /// centred on the origin and sized by the margin floor alone.
    pub fn compute<I>(self, points: I) -> MapResult<Extent>
    where
        I: IntoIterator<Item = Coord>,
    {
        if !self.min_margin.is_finite() || self.min_margin <= 0.0 {
            return Err(MapError::InvalidData(
                "extent margin floor must be finite and > 0".to_owned(),
            ));
        }
        let margin_percent = if self.margin_percent.is_finite() {
            self.margin_percent.max(0.0)
        } else {
            0.0
        };

        let bounds = points
            .into_iter()
            .filter(|point| point.is_finite())
            .fold(None, |acc: Option<(f64, f64, f64, f64)>, point| {
                Some(match acc {
                    None => (point.axis1, point.axis2, point.axis1, point.axis2),
                    Some((min1, min2, max1, max2)) => (
                        min1.min(point.axis1),
                        min2.min(point.axis2),
                        max1.max(point.axis1),
                        max2.max(point.axis2),
                    ),
                })
            });
        let (min1, min2, max1, max2) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));

        let margin1 = ((max1 - min1) * margin_percent / 100.0).max(self.min_margin);
        let margin2 = ((max2 - min2) * margin_percent / 100.0).max(self.min_margin);
        trace!(
            margin_percent,
            margin1,
            margin2,
            empty = bounds.is_none(),
            "computed extent margins"
        );

        Extent::new(min1 - margin1, min2 - margin2, max1 + margin1, max2 + margin2)
    }
}

#[cfg(test)]
mod tests {
    use super::{Extent, ExtentCalculator};
    use crate::core::types::Coord;

    #[test]
    fn single_point_gets_floor_margin_on_both_axes() {
        let extent = ExtentCalculator::path_map()
            .compute([Coord::new(12.5, 41.9)])
            .expect("extent");
        assert!((extent.width() - 0.2).abs() < 1e-12);
        assert!((extent.height() - 0.2).abs() < 1e-12);
        assert!(extent.contains(Coord::new(12.5, 41.9)));
    }

    #[test]
    fn empty_input_still_yields_positive_area() {
        let extent = ExtentCalculator::occultation()
            .compute(std::iter::empty())
            .expect("extent");
        assert_eq!(extent.center(), Coord::new(0.0, 0.0));
        assert!(extent.width() > 0.0 && extent.height() > 0.0);
    }

    #[test]
    fn margin_scales_with_range_above_floor() {
        let extent = ExtentCalculator::new(10.0, 0.1)
            .compute([Coord::new(0.0, 0.0), Coord::new(20.0, 10.0)])
            .expect("extent");
        assert_eq!(extent, Extent::new(-2.0, -1.0, 22.0, 11.0).expect("box"));
    }

    #[test]
    fn centered_extent_rejects_non_positive_span() {
        assert!(Extent::centered(Coord::new(1.0, 1.0), 0.0).is_err());
        assert!(Extent::centered(Coord::new(1.0, 1.0), f64::NAN).is_err());
    }
}
