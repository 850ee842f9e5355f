//! Style resolution: one flat style struct per assembler family, resolved
//! into per-entity [`DrawAttributes`].

mod occultation;
mod path_map;
mod sky_map;

pub use occultation::OccultationStyle;
pub use path_map::PathMapStyle;
pub use sky_map::{FinderChartStyle, SkyMapStyle};

use serde::{Deserialize, Serialize};

use crate::core::StationGroupKind;
use crate::render::{Color, StrokePattern};

/// Upper bound for magnitude-scaled markers, as a multiple of the base size.
pub const MAGNITUDE_SIZE_CAP: f64 = 6.0;
const MAGNITUDE_SIZE_SLOPE: f64 = 0.35;

/// Primitive class an entity is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Grid,
    BaseLayer,
    ConstellationBoundary,
    ConstellationName,
    ConstellationLine,
    SigmaLimit,
    GpsTrack,
    CentralLine,
    Trajectory,
    TrajectoryTick,
    Star,
    TimeMarker,
    Station(StationGroupKind),
    GpsPoint,
    Target,
    FovIndicator,
}

/// Resolved draw attributes for one entity class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawAttributes {
    /// `false` suppresses the whole class (e.g. grid switched off).
    pub visible: bool,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    pub marker_size: f64,
    pub font_size: f64,
    pub label_color: Color,
    pub show_label: bool,
    pub pattern: StrokePattern,
}

impl DrawAttributes {
    #[must_use]
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            visible: true,
            stroke_color: color,
            stroke_width: width,
            fill: None,
            marker_size: 0.0,
            font_size: 10.0,
            label_color: Color::BLACK,
            show_label: false,
            pattern: StrokePattern::Solid,
        }
    }

    #[must_use]
    pub fn marker(color: Color, size: f64, font_size: f64, label_color: Color) -> Self {
        Self {
            fill: Some(color),
            marker_size: size,
            font_size,
            label_color,
            ..Self::stroke(color, 1.0)
        }
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: StrokePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Label text to draw: present only when labels are on and `text` is non-empty.
    #[must_use]
    pub fn label(&self, text: Option<&str>) -> Option<String> {
        if !self.show_label {
            return None;
        }
        text.filter(|text| !text.is_empty()).map(str::to_owned)
    }

    /// Fill color for markers, falling back to the stroke color.
    #[must_use]
    pub fn marker_color(&self) -> Color {
        self.fill.unwrap_or(self.stroke_color)
    }
}

/// One legend swatch for HTML export.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: Color,
}

impl LegendEntry {
    #[must_use]
    pub fn new(label: &'static str, color: Color) -> Self {
        Self { label, color }
    }
}

/// Contract shared by every family style.
///
/// One style object covers a whole render pass; there is no per-entity
/// override.
pub trait StyleConfig {
    fn background(&self) -> Color;

    fn resolve(&self, class: EntityClass) -> DrawAttributes;

    /// Fixed grid step in domain units; `None` picks one from the extent.
    fn grid_step(&self) -> Option<f64> {
        None
    }

    /// Whether star markers grow with brightness.
    fn scales_by_magnitude(&self) -> bool {
        false
    }

    fn legend(&self) -> Vec<LegendEntry>;
}

/// Marker diameter for a star of `magnitude` under `limit`.
///
/// `base * (1 + 0.35 * max(0, limit - magnitude))`, capped at
/// [`MAGNITUDE_SIZE_CAP`] times the base.
#[must_use]
pub fn magnitude_marker_size(base: f64, magnitude: f64, limit: f64) -> f64 {
    let headroom = (limit - magnitude).max(0.0);
    (base * (1.0 + MAGNITUDE_SIZE_SLOPE * headroom)).min(base * MAGNITUDE_SIZE_CAP)
}
