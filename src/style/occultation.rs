use serde::{Deserialize, Serialize};

use crate::core::StationGroupKind;
use crate::render::Color;
use crate::style::{DrawAttributes, EntityClass, LegendEntry, StyleConfig};

/// Occultation map style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccultationStyle {
    pub background_color: Color,
    pub central_line_color: Color,
    pub central_line_width: f64,
    pub sigma_line_color: Color,
    pub sigma_line_width: f64,
    pub time_marker_color: Color,
    pub time_marker_size: f64,
    pub station_positive_color: Color,
    pub station_negative_color: Color,
    pub station_clouded_color: Color,
    pub station_size: f64,
    pub label_color: Color,
    pub label_font_size: f64,
    pub base_layer_color: Color,
    pub base_layer_width: f64,
    pub grid_color: Color,
    pub grid_width: f64,
    pub grid_step_degrees: f64,
    pub show_grid: bool,
    pub show_time_labels: bool,
    pub show_station_labels: bool,
}

impl Default for OccultationStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb8(0xE0, 0xE0, 0xE0),
            central_line_color: Color::rgb8(0xFF, 0x00, 0x00),
            central_line_width: 3.0,
            sigma_line_color: Color::rgb8(0xFF, 0xA5, 0x00),
            sigma_line_width: 2.0,
            time_marker_color: Color::rgb8(0x00, 0x00, 0xFF),
            time_marker_size: 10.0,
            station_positive_color: Color::rgb8(0x00, 0xFF, 0x00),
            station_negative_color: Color::rgb8(0xFF, 0x00, 0x00),
            station_clouded_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            station_size: 8.0,
            label_color: Color::BLACK,
            label_font_size: 10.0,
            base_layer_color: Color::rgb8(128, 128, 128),
            base_layer_width: 1.0,
            grid_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            grid_width: 0.5,
            grid_step_degrees: 5.0,
            show_grid: true,
            show_time_labels: true,
            show_station_labels: true,
        }
    }
}

impl StyleConfig for OccultationStyle {
    fn background(&self) -> Color {
        self.background_color
    }

    fn resolve(&self, class: EntityClass) -> DrawAttributes {
        let station = |color: Color| {
            DrawAttributes::marker(color, self.station_size, self.label_font_size, self.label_color)
                .with_label(self.show_station_labels)
        };
        match class {
            EntityClass::Grid => {
                DrawAttributes::stroke(self.grid_color, self.grid_width).visible(self.show_grid)
            }
            EntityClass::BaseLayer => {
                DrawAttributes::stroke(self.base_layer_color, self.base_layer_width)
            }
            EntityClass::SigmaLimit => {
                DrawAttributes::stroke(self.sigma_line_color, self.sigma_line_width)
            }
            EntityClass::CentralLine => {
                DrawAttributes::stroke(self.central_line_color, self.central_line_width)
            }
            EntityClass::TimeMarker => DrawAttributes::marker(
                self.time_marker_color,
                self.time_marker_size,
                self.label_font_size,
                self.label_color,
            )
            .with_label(self.show_time_labels),
            EntityClass::Station(StationGroupKind::Positive) => station(self.station_positive_color),
            EntityClass::Station(StationGroupKind::Negative) => station(self.station_negative_color),
            EntityClass::Station(StationGroupKind::Other) => station(self.station_clouded_color),
            EntityClass::ConstellationBoundary
            | EntityClass::ConstellationName
            | EntityClass::ConstellationLine
            | EntityClass::GpsTrack
            | EntityClass::Trajectory
            | EntityClass::TrajectoryTick
            | EntityClass::Star
            | EntityClass::GpsPoint
            | EntityClass::Target
            | EntityClass::FovIndicator => {
                DrawAttributes::stroke(self.label_color, 1.0).visible(false)
            }
        }
    }

    fn grid_step(&self) -> Option<f64> {
        Some(self.grid_step_degrees).filter(|step| step.is_finite() && *step > 0.0)
    }

    fn legend(&self) -> Vec<LegendEntry> {
        vec![
            LegendEntry::new("Central line", self.central_line_color),
            LegendEntry::new("1-sigma limits", self.sigma_line_color),
            LegendEntry::new("Time markers", self.time_marker_color),
            LegendEntry::new("Positive station", self.station_positive_color),
            LegendEntry::new("Negative station", self.station_negative_color),
            LegendEntry::new("Clouded / other station", self.station_clouded_color),
        ]
    }
}
