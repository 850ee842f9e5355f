use smallvec::{SmallVec, smallvec};

use crate::core::extent::Extent;
use crate::core::types::Coord;

pub const GRID_TARGET_DIVISIONS: usize = 6;
pub const GRID_MAX_LINES_PER_AXIS: usize = 120;

/// One straight graticule line in extent space.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub points: SmallVec<[Coord; 2]>,
}

/// Picks a 1/2/5 x 10^n step that divides `span` into roughly `divisions` parts.
#[must_use]
pub fn nice_grid_step(span: f64, divisions: usize) -> Option<f64> {
    if !span.is_finite() || span <= 0.0 || divisions == 0 {
        return None;
    }
    let raw = span / divisions as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    Some(nice * magnitude)
}

/// Graticule lines at multiples of `step` inside `extent`.
///
/// Meridian-like lines (constant axis 1) come first, then parallels. Each axis
/// is capped at [`GRID_MAX_LINES_PER_AXIS`]; an axis that would exceed the cap
/// is skipped entirely.
#[must_use]
pub fn grid_lines(extent: Extent, step: f64) -> Vec<GridLine> {
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for value in axis_ticks(extent.min1, extent.max1, step) {
        lines.push(GridLine {
            points: smallvec![
                Coord::new(value, extent.min2),
                Coord::new(value, extent.max2)
            ],
        });
    }
    for value in axis_ticks(extent.min2, extent.max2, step) {
        lines.push(GridLine {
            points: smallvec![
                Coord::new(extent.min1, value),
                Coord::new(extent.max1, value)
            ],
        });
    }
    lines
}

fn axis_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    if last < first || (last - first) as usize + 1 > GRID_MAX_LINES_PER_AXIS {
        return Vec::new();
    }
    (first..=last).map(|index| index as f64 * step).collect()
}
