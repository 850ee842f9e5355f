use serde::{Deserialize, Serialize};

use crate::render::{Color, StrokePattern};
use crate::style::{DrawAttributes, EntityClass, LegendEntry, StyleConfig};

/// Sky map style. Every field has a default, so a partial document loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyMapStyle {
    pub background_color: Color,
    pub grid_color: Color,
    pub grid_width: f64,
    /// Fixed graticule step in degrees; unset picks a step from the field.
    pub grid_step_degrees: Option<f64>,
    pub star_color: Color,
    pub star_label_color: Color,
    pub constellation_line_color: Color,
    pub constellation_line_width: f64,
    pub constellation_boundary_color: Color,
    pub constellation_boundary_width: f64,
    pub constellation_name_color: Color,
    pub target_color: Color,
    pub trajectory_color: Color,
    pub trajectory_width: f64,
    pub fov_rect_color: Color,
    pub fov_rect_width: f64,
    pub star_base_size: f64,
    pub target_size: f64,
    pub label_font_size: f64,
    pub show_grid: bool,
    pub show_star_labels: bool,
    pub show_constellation_lines: bool,
    pub show_constellation_boundaries: bool,
    pub show_constellation_names: bool,
    pub show_trajectory_labels: bool,
    pub show_magnitude_scale: bool,
}

impl Default for SkyMapStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            grid_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            grid_width: 0.5,
            grid_step_degrees: None,
            star_color: Color::BLACK,
            star_label_color: Color::rgb8(0x00, 0x33, 0x66),
            constellation_line_color: Color::rgb8(0x00, 0x66, 0xCC),
            constellation_line_width: 1.0,
            constellation_boundary_color: Color::rgb8(0x00, 0xAA, 0x00),
            constellation_boundary_width: 1.5,
            constellation_name_color: Color::rgb8(0x00, 0xAA, 0x00),
            target_color: Color::rgb8(0xFF, 0x00, 0x00),
            trajectory_color: Color::rgb8(0xFF, 0x66, 0x00),
            trajectory_width: 2.0,
            fov_rect_color: Color::rgb8(0x99, 0x00, 0x00),
            fov_rect_width: 2.0,
            star_base_size: 2.0,
            target_size: 6.0,
            label_font_size: 8.0,
            show_grid: true,
            show_star_labels: true,
            show_constellation_lines: true,
            show_constellation_boundaries: true,
            show_constellation_names: false,
            show_trajectory_labels: true,
            show_magnitude_scale: true,
        }
    }
}

impl StyleConfig for SkyMapStyle {
    fn background(&self) -> Color {
        self.background_color
    }

    fn resolve(&self, class: EntityClass) -> DrawAttributes {
        let font = self.label_font_size;
        match class {
            EntityClass::Grid => {
                DrawAttributes::stroke(self.grid_color, self.grid_width).visible(self.show_grid)
            }
            EntityClass::ConstellationBoundary => DrawAttributes::stroke(
                self.constellation_boundary_color,
                self.constellation_boundary_width,
            )
            .visible(self.show_constellation_boundaries),
            EntityClass::ConstellationName => DrawAttributes::marker(
                self.constellation_name_color,
                0.0,
                font,
                self.constellation_name_color,
            )
            .visible(self.show_constellation_names)
            .with_label(true),
            EntityClass::ConstellationLine => DrawAttributes::stroke(
                self.constellation_line_color,
                self.constellation_line_width,
            )
            .visible(self.show_constellation_lines),
            EntityClass::Trajectory => {
                DrawAttributes::stroke(self.trajectory_color, self.trajectory_width)
            }
            EntityClass::TrajectoryTick => DrawAttributes::marker(
                self.trajectory_color,
                self.trajectory_width * 1.5,
                font,
                self.trajectory_color,
            )
            .with_label(self.show_trajectory_labels),
            EntityClass::Star => {
                DrawAttributes::marker(self.star_color, self.star_base_size, font, self.star_label_color)
                    .with_label(self.show_star_labels)
            }
            // Target labels run two points above the regular label font.
            EntityClass::Target => {
                DrawAttributes::marker(self.target_color, self.target_size, font + 2.0, self.target_color)
                    .with_label(true)
            }
            EntityClass::FovIndicator => {
                DrawAttributes::stroke(self.fov_rect_color, self.fov_rect_width)
                    .with_pattern(StrokePattern::FOV_DASH)
            }
            EntityClass::BaseLayer
            | EntityClass::SigmaLimit
            | EntityClass::GpsTrack
            | EntityClass::CentralLine
            | EntityClass::TimeMarker
            | EntityClass::Station(_)
            | EntityClass::GpsPoint => {
                DrawAttributes::stroke(self.star_color, 1.0).visible(false)
            }
        }
    }

    fn grid_step(&self) -> Option<f64> {
        self.grid_step_degrees
    }

    fn scales_by_magnitude(&self) -> bool {
        self.show_magnitude_scale
    }

    fn legend(&self) -> Vec<LegendEntry> {
        vec![
            LegendEntry::new("Stars", self.star_color),
            LegendEntry::new("Constellation lines", self.constellation_line_color),
            LegendEntry::new("Constellation boundaries", self.constellation_boundary_color),
            LegendEntry::new("Target", self.target_color),
            LegendEntry::new("Trajectory", self.trajectory_color),
            LegendEntry::new("Field of view", self.fov_rect_color),
        ]
    }
}

/// Finder chart style.
///
/// Shares the sky map's entity classes; only the palette differs. There is
/// no field-of-view rectangle on a finder chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderChartStyle {
    pub background_color: Color,
    pub grid_color: Color,
    pub grid_width: f64,
    pub grid_step_degrees: Option<f64>,
    pub star_color: Color,
    pub star_label_color: Color,
    pub constellation_line_color: Color,
    pub constellation_line_width: f64,
    pub constellation_boundary_color: Color,
    pub constellation_boundary_width: f64,
    pub target_color: Color,
    pub trajectory_color: Color,
    pub trajectory_width: f64,
    pub star_base_size: f64,
    pub target_size: f64,
    pub label_font_size: f64,
    pub show_grid: bool,
    pub show_star_labels: bool,
    pub show_constellation_lines: bool,
    pub show_constellation_boundaries: bool,
    pub show_constellation_names: bool,
    pub show_trajectory_labels: bool,
    pub show_magnitude_scale: bool,
}

impl Default for FinderChartStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            grid_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            grid_width: 0.5,
            grid_step_degrees: None,
            star_color: Color::BLACK,
            star_label_color: Color::BLACK,
            constellation_line_color: Color::rgb8(0x00, 0x00, 0xFF),
            constellation_line_width: 1.0,
            constellation_boundary_color: Color::rgb8(0x00, 0xAA, 0x00),
            constellation_boundary_width: 0.5,
            target_color: Color::rgb8(0xFF, 0x00, 0x00),
            trajectory_color: Color::rgb8(0xFF, 0x88, 0x00),
            trajectory_width: 2.0,
            star_base_size: 2.0,
            target_size: 6.0,
            label_font_size: 8.0,
            show_grid: true,
            show_star_labels: true,
            show_constellation_lines: true,
            show_constellation_boundaries: true,
            show_constellation_names: true,
            show_trajectory_labels: true,
            show_magnitude_scale: true,
        }
    }
}

impl From<&FinderChartStyle> for SkyMapStyle {
    fn from(style: &FinderChartStyle) -> Self {
        Self {
            background_color: style.background_color,
            grid_color: style.grid_color,
            grid_width: style.grid_width,
            grid_step_degrees: style.grid_step_degrees,
            star_color: style.star_color,
            star_label_color: style.star_label_color,
            constellation_line_color: style.constellation_line_color,
            constellation_line_width: style.constellation_line_width,
            constellation_boundary_color: style.constellation_boundary_color,
            constellation_boundary_width: style.constellation_boundary_width,
            constellation_name_color: style.constellation_boundary_color,
            target_color: style.target_color,
            trajectory_color: style.trajectory_color,
            trajectory_width: style.trajectory_width,
            star_base_size: style.star_base_size,
            target_size: style.target_size,
            label_font_size: style.label_font_size,
            show_grid: style.show_grid,
            show_star_labels: style.show_star_labels,
            show_constellation_lines: style.show_constellation_lines,
            show_constellation_boundaries: style.show_constellation_boundaries,
            show_constellation_names: style.show_constellation_names,
            show_trajectory_labels: style.show_trajectory_labels,
            show_magnitude_scale: style.show_magnitude_scale,
            ..Self::default()
        }
    }
}

impl StyleConfig for FinderChartStyle {
    fn background(&self) -> Color {
        self.background_color
    }

    fn resolve(&self, class: EntityClass) -> DrawAttributes {
        match class {
            EntityClass::FovIndicator => {
                DrawAttributes::stroke(self.target_color, 1.0).visible(false)
            }
            other => SkyMapStyle::from(self).resolve(other),
        }
    }

    fn grid_step(&self) -> Option<f64> {
        self.grid_step_degrees
    }

    fn scales_by_magnitude(&self) -> bool {
        self.show_magnitude_scale
    }

    fn legend(&self) -> Vec<LegendEntry> {
        vec![
            LegendEntry::new("Stars", self.star_color),
            LegendEntry::new("Constellation lines", self.constellation_line_color),
            LegendEntry::new("Constellation boundaries", self.constellation_boundary_color),
            LegendEntry::new("Target", self.target_color),
            LegendEntry::new("Trajectory", self.trajectory_color),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{FinderChartStyle, SkyMapStyle};
    use crate::style::{EntityClass, StyleConfig};

    #[test]
    fn target_label_font_is_two_points_larger() {
        let style = SkyMapStyle::default();
        let target = style.resolve(EntityClass::Target);
        assert_eq!(target.font_size, style.label_font_size + 2.0);
        assert_eq!(target.label(Some("17030 Ponce")).as_deref(), Some("17030 Ponce"));
    }

    #[test]
    fn finder_chart_palette_flows_through_shared_resolution() {
        let style = FinderChartStyle::default();
        let line = style.resolve(EntityClass::ConstellationLine);
        assert_eq!(line.stroke_color.to_hex(), "#0000FF");
        assert!(style.resolve(EntityClass::ConstellationName).visible);
        assert!(!style.resolve(EntityClass::FovIndicator).visible);
    }

    #[test]
    fn hidden_flags_turn_classes_off() {
        let style = SkyMapStyle {
            show_grid: false,
            show_star_labels: false,
            ..SkyMapStyle::default()
        };
        assert!(!style.resolve(EntityClass::Grid).visible);
        assert_eq!(style.resolve(EntityClass::Star).label(Some("SAO 7")), None);
        assert!(!style.resolve(EntityClass::ConstellationName).visible);
    }
}
