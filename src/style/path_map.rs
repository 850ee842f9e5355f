use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::style::{DrawAttributes, EntityClass, LegendEntry, StyleConfig};

/// GPS path map style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathMapStyle {
    pub background_color: Color,
    pub track_color: Color,
    pub track_width: f64,
    pub marker_color: Color,
    pub marker_size: f64,
    pub label_color: Color,
    pub label_font_size: f64,
    pub base_layer_color: Color,
    pub base_layer_width: f64,
    pub grid_color: Color,
    pub grid_width: f64,
    pub show_grid: bool,
    pub show_point_labels: bool,
}

impl Default for PathMapStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            track_color: Color::rgb8(0x00, 0x00, 0xFF),
            track_width: 2.0,
            marker_color: Color::rgb8(0xFF, 0x00, 0x00),
            marker_size: 8.0,
            label_color: Color::BLACK,
            label_font_size: 10.0,
            base_layer_color: Color::rgb8(128, 128, 128),
            base_layer_width: 1.0,
            grid_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            grid_width: 0.5,
            show_grid: false,
            show_point_labels: true,
        }
    }
}

impl StyleConfig for PathMapStyle {
    fn background(&self) -> Color {
        self.background_color
    }

    fn resolve(&self, class: EntityClass) -> DrawAttributes {
        match class {
            EntityClass::Grid => {
                DrawAttributes::stroke(self.grid_color, self.grid_width).visible(self.show_grid)
            }
            EntityClass::BaseLayer => {
                DrawAttributes::stroke(self.base_layer_color, self.base_layer_width)
            }
            EntityClass::GpsTrack => DrawAttributes::stroke(self.track_color, self.track_width),
            EntityClass::GpsPoint => DrawAttributes::marker(
                self.marker_color,
                self.marker_size,
                self.label_font_size,
                self.label_color,
            )
            .with_label(self.show_point_labels),
            _ => DrawAttributes::stroke(self.label_color, 1.0).visible(false),
        }
    }

    fn legend(&self) -> Vec<LegendEntry> {
        vec![
            LegendEntry::new("Track", self.track_color),
            LegendEntry::new("Points", self.marker_color),
        ]
    }
}
