use std::path::Path;

use tracing::{debug, warn};

use crate::core::{
    CelestialScene, ConstellationBoundary, ConstellationLine, Coord, FieldOfView, Star, Target,
    Viewport,
};
use crate::error::MapResult;
use crate::io::{LoadReport, read_finder_chart};
use crate::render::{Canvas, MapFrame};
use crate::style::{FinderChartStyle, StyleConfig};

use super::render_session::RenderSession;
use super::{HtmlReport, LayerCompositor, RenderOutcome};

/// Printable star field used to locate one target.
#[derive(Debug)]
pub struct FinderChartAssembler<C: Canvas> {
    session: RenderSession<C>,
    scene: CelestialScene,
    style: FinderChartStyle,
}

impl<C: Canvas> FinderChartAssembler<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            session: RenderSession::new(canvas),
            scene: CelestialScene::default(),
            style: FinderChartStyle::default(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.session.viewport()
    }

    pub fn set_field_of_view(&mut self, center_ra_deg: f64, center_dec_deg: f64, fov_deg: f64) {
        self.scene.field = FieldOfView::new(Coord::new(center_ra_deg, center_dec_deg), fov_deg);
    }

    #[must_use]
    pub fn field_of_view(&self) -> FieldOfView {
        self.scene.field
    }

    pub fn set_magnitude_limit(&mut self, magnitude_limit: f64) {
        self.scene.filter.magnitude_limit = magnitude_limit;
    }

    pub fn add_stars(&mut self, stars: impl IntoIterator<Item = Star>) {
        self.scene.stars.extend(stars);
    }

    pub fn add_constellation_lines(&mut self, lines: impl IntoIterator<Item = ConstellationLine>) {
        self.scene.constellation_lines.extend(lines);
    }

    pub fn add_constellation_boundaries(
        &mut self,
        boundaries: impl IntoIterator<Item = ConstellationBoundary>,
    ) {
        self.scene.constellation_boundaries.extend(boundaries);
    }

    pub fn set_target(&mut self, target: Target) {
        self.scene.target = target;
    }

    pub fn clear_overlays(&mut self) {
        self.scene.clear_overlays();
    }

    pub fn set_style(&mut self, style: FinderChartStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn style(&self) -> &FinderChartStyle {
        &self.style
    }

    #[must_use]
    pub fn scene(&self) -> &CelestialScene {
        &self.scene
    }

    /// Replaces the whole scene from a finder chart document.
    ///
    /// Returns `false` and keeps the current scene when the file cannot be
    /// read or is not a JSON object.
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> bool {
        match self.load_from_json_with_report(path) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "finder chart load failed");
                false
            }
        }
    }

    /// Like [`Self::load_from_json`], returning the field diagnostics.
    pub fn load_from_json_with_report(&mut self, path: impl AsRef<Path>) -> MapResult<LoadReport> {
        let (scene, report) = read_finder_chart(path.as_ref())?;
        if !report.is_complete() {
            debug!(
                missing = ?report.missing_fields,
                invalid = ?report.invalid_fields,
                skipped = ?report.skipped_records,
                "finder chart document incomplete"
            );
        }
        self.scene = scene;
        Ok(report)
    }

    pub fn build_frame(&self) -> MapResult<MapFrame> {
        let projector = self.scene.projector()?;
        let mut compositor = LayerCompositor::new(self.viewport(), &projector, &self.style);
        compositor.celestial_scene(&self.scene);
        let frame = compositor.finish();
        debug!(
            target = %self.scene.target.name,
            primitives = frame.primitives.len(),
            "finder chart composed"
        );
        Ok(frame)
    }

    pub fn render_to_file(&mut self, path: impl AsRef<Path>) -> RenderOutcome {
        let frame = self.build_frame();
        self.session.render_to_file(frame, path.as_ref())
    }

    pub fn render_to_buffer(&mut self) -> RenderOutcome {
        let frame = self.build_frame();
        self.session.render_to_buffer(frame)
    }

    pub fn export_html(&mut self, path: impl AsRef<Path>, title: &str) -> RenderOutcome {
        let field = self.scene.field;
        let target = if self.scene.target.is_set() {
            self.scene.target.name.clone()
        } else {
            "-".to_owned()
        };
        let report = HtmlReport::new(title)
            .with_row("Target", target)
            .with_row(
                "Centre",
                format!(
                    "RA {:.4}°, Dec {:+.4}°",
                    field.center.axis1, field.center.axis2
                ),
            )
            .with_row("Field of view", format!("{:.2}°", field.span))
            .with_row(
                "Magnitude limit",
                format!("{:.1}", self.scene.filter.magnitude_limit),
            )
            .with_legend(self.style.legend());
        let frame = self.build_frame();
        self.session.export_html(frame, path.as_ref(), report)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error()
    }

    #[must_use]
    pub fn last_rendered_buffer(&self) -> Option<&[u8]> {
        self.session.last_rendered_buffer()
    }

    #[must_use]
    pub fn last_rendered_image_base64(&self) -> String {
        self.session.last_rendered_image_base64()
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        self.session.canvas()
    }

    #[must_use]
    pub fn into_canvas(self) -> C {
        self.session.into_canvas()
    }
}
