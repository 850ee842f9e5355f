use serde::{Deserialize, Serialize};

/// Output raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Plain `(axis1, axis2)` pair.
///
/// The axes mean longitude/latitude or right-ascension/declination depending
/// on which assembler owns the value. Both are expressed in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub axis1: f64,
    pub axis2: f64,
}

impl Coord {
    #[must_use]
    pub const fn new(axis1: f64, axis2: f64) -> Self {
        Self { axis1, axis2 }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.axis1.is_finite() && self.axis2.is_finite()
    }
}

impl From<(f64, f64)> for Coord {
    fn from((axis1, axis2): (f64, f64)) -> Self {
        Self::new(axis1, axis2)
    }
}

/// A coordinate with an optional text label (GPS fix, marker, station).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub position: Coord,
    pub label: Option<String>,
}

impl LabeledPoint {
    #[must_use]
    pub fn new(axis1: f64, axis2: f64) -> Self {
        Self {
            position: Coord::new(axis1, axis2),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
        self
    }

    /// Label text when present and non-empty.
    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }
}
