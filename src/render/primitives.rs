use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::core::Coord;
use crate::error::{MapError, MapResult};
use crate::style::EntityClass;

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a small set of CSS names.
    pub fn from_hex(text: &str) -> MapResult<Self> {
        let text = text.trim();
        if let Some(named) = named_color(text) {
            return Ok(named);
        }
        let digits = text.strip_prefix('#').ok_or_else(|| {
            MapError::InvalidData(format!("color `{text}` must start with `#` or be a known name"))
        })?;
        let channel = |range: std::ops::Range<usize>| -> MapResult<u8> {
            digits
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| MapError::InvalidData(format!("color `{text}` is not valid hex")))
        };
        match digits.len() {
            3 => {
                let short = |index: usize| channel(index..index + 1).map(|v| v * 17);
                Ok(Self::rgb8(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => {
                let base = Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                Ok(Self {
                    alpha: f64::from(channel(6..8)?) / 255.0,
                    ..base
                })
            }
            _ => Err(MapError::InvalidData(format!(
                "color `{text}` must have 3, 6 or 8 hex digits"
            ))),
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        let to_u8 = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!(
            "#{:02X}{:02X}{:02X}",
            to_u8(self.red),
            to_u8(self.green),
            to_u8(self.blue)
        );
        if to_u8(self.alpha) == u8::MAX {
            rgb
        } else {
            format!("{rgb}{:02X}", to_u8(self.alpha))
        }
    }

    pub fn validate(self) -> MapResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MapError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "red" => Color::rgb8(255, 0, 0),
        "green" => Color::rgb8(0, 128, 0),
        "blue" => Color::rgb8(0, 0, 255),
        "orange" => Color::rgb8(255, 165, 0),
        "gray" | "grey" => Color::rgb8(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Stroke dash pattern, lengths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum StrokePattern {
    #[default]
    Solid,
    Dashed { on_px: f64, off_px: f64 },
}

impl StrokePattern {
    pub const FOV_DASH: Self = Self::Dashed {
        on_px: 8.0,
        off_px: 5.0,
    };
}

/// Styled polyline in extent space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub class: EntityClass,
    pub points: SmallVec<[Coord; 4]>,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub pattern: StrokePattern,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(
        class: EntityClass,
        points: impl IntoIterator<Item = Coord>,
        stroke_color: Color,
        stroke_width: f64,
    ) -> Self {
        Self {
            class,
            points: points.into_iter().collect(),
            stroke_color,
            stroke_width,
            pattern: StrokePattern::Solid,
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: StrokePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.points.len() < 2 {
            return Err(MapError::InvalidData(
                "path primitive needs at least two points".to_owned(),
            ));
        }
        if self.points.iter().any(|point| !point.is_finite()) {
            return Err(MapError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(MapError::InvalidData(
                "path stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let StrokePattern::Dashed { on_px, off_px } = self.pattern {
            if !(on_px.is_finite() && off_px.is_finite() && on_px > 0.0 && off_px >= 0.0) {
                return Err(MapError::InvalidData(
                    "dash lengths must be finite, on > 0 and off >= 0".to_owned(),
                ));
            }
        }
        self.stroke_color.validate()
    }
}

/// One marker inside a [`PointBatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub position: Coord,
    /// Marker diameter in pixels; `0` draws the label only.
    pub size_px: f64,
    pub label: Option<String>,
}

impl PointMarker {
    #[must_use]
    pub fn new(position: Coord, size_px: f64, label: Option<String>) -> Self {
        Self {
            position,
            size_px,
            label,
        }
    }
}

/// Batch of markers sharing one color and label font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointBatch {
    pub class: EntityClass,
    pub markers: Vec<PointMarker>,
    pub marker_color: Color,
    pub label_color: Color,
    pub font_size_px: f64,
}

impl PointBatch {
    #[must_use]
    pub fn new(class: EntityClass, marker_color: Color, label_color: Color, font_size_px: f64) -> Self {
        Self {
            class,
            markers: Vec::new(),
            marker_color,
            label_color,
            font_size_px,
        }
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Vec<PointMarker>) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn label_count(&self) -> usize {
        self.markers.iter().filter(|marker| marker.label.is_some()).count()
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.markers.is_empty() {
            return Err(MapError::InvalidData(
                "point batch must contain at least one marker".to_owned(),
            ));
        }
        for marker in &self.markers {
            if !marker.position.is_finite() {
                return Err(MapError::InvalidData(
                    "marker coordinates must be finite".to_owned(),
                ));
            }
            if !marker.size_px.is_finite() || marker.size_px < 0.0 {
                return Err(MapError::InvalidData(
                    "marker size must be finite and >= 0".to_owned(),
                ));
            }
            if marker.label.as_deref() == Some("") {
                return Err(MapError::InvalidData(
                    "marker label must not be empty when present".to_owned(),
                ));
            }
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(MapError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.marker_color.validate()?;
        self.label_color.validate()
    }
}

/// External vector-file overlay (e.g. a country-borders shapefile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    pub source: PathBuf,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl BaseLayer {
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            stroke_color: Color::rgb8(128, 128, 128),
            stroke_width: 1.0,
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.name.is_empty() {
            return Err(MapError::InvalidData(
                "base layer name must not be empty".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(MapError::InvalidData(
                "base layer stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.stroke_color.validate()
    }
}

/// One draw command, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapPrimitive {
    BaseLayer(BaseLayer),
    Path(PathPrimitive),
    Points(PointBatch),
}

impl MapPrimitive {
    #[must_use]
    pub fn class(&self) -> EntityClass {
        match self {
            Self::BaseLayer(_) => EntityClass::BaseLayer,
            Self::Path(path) => path.class,
            Self::Points(batch) => batch.class,
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        match self {
            Self::BaseLayer(layer) => layer.validate(),
            Self::Path(path) => path.validate(),
            Self::Points(batch) => batch.validate(),
        }
    }
}
