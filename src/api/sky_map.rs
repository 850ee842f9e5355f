use std::path::Path;

use tracing::debug;

use crate::core::{
    CelestialScene, ConstellationBoundary, ConstellationLine, Coord, FieldOfView, Star, Target,
    Viewport,
};
use crate::error::MapResult;
use crate::render::{Canvas, MapFrame};
use crate::style::{SkyMapStyle, StyleConfig};

use super::render_session::RenderSession;
use super::{HtmlReport, LayerCompositor, RenderOutcome};

/// Star field around a centre, with asterisms, boundaries, an optional
/// target and an optional finder-chart footprint.
#[derive(Debug)]
pub struct SkyMapAssembler<C: Canvas> {
    session: RenderSession<C>,
    scene: CelestialScene,
    finder_chart_bounds: Option<FieldOfView>,
    style: SkyMapStyle,
}

impl<C: Canvas> SkyMapAssembler<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            session: RenderSession::new(canvas),
            scene: CelestialScene::default(),
            finder_chart_bounds: None,
            style: SkyMapStyle::default(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.session.viewport()
    }

    /// Centre and span in degrees. Validated at render time.
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

    #[must_use]
    pub fn magnitude_limit(&self) -> f64 {
        self.scene.filter.magnitude_limit
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

    /// Outlines a finder chart's field as a dashed rectangle.
    pub fn set_finder_chart_bounds(&mut self, center_ra_deg: f64, center_dec_deg: f64, fov_deg: f64) {
        self.finder_chart_bounds = Some(FieldOfView::new(
            Coord::new(center_ra_deg, center_dec_deg),
            fov_deg,
        ));
    }

    pub fn clear_finder_chart_bounds(&mut self) {
        self.finder_chart_bounds = None;
    }

    /// Drops stars, lines, boundaries, target and finder bounds.
    pub fn clear_overlays(&mut self) {
        self.scene.clear_overlays();
        self.finder_chart_bounds = None;
    }

    pub fn set_style(&mut self, style: SkyMapStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn style(&self) -> &SkyMapStyle {
        &self.style
    }

    #[must_use]
    pub fn scene(&self) -> &CelestialScene {
        &self.scene
    }

    pub fn visible_stars(&self) -> impl Iterator<Item = &Star> + '_ {
        self.scene.visible_stars()
    }

    /// Composes the scene without touching the canvas.
    pub fn build_frame(&self) -> MapResult<MapFrame> {
        let projector = self.scene.projector()?;
        let mut compositor = LayerCompositor::new(self.viewport(), &projector, &self.style);
        compositor.celestial_scene(&self.scene);
        if let Some(bounds) = self.finder_chart_bounds {
            compositor.field_of_view(bounds.validate()?.extent()?);
        }
        let frame = compositor.finish();
        debug!(
            center_ra = self.scene.field.center.axis1,
            center_dec = self.scene.field.center.axis2,
            fov = self.scene.field.span,
            primitives = frame.primitives.len(),
            "sky map composed"
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
        let mut report = HtmlReport::new(title)
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
        if self.scene.target.is_set() {
            report = report.with_row("Target", self.scene.target.name.clone());
        }
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

    pub fn canvas_mut(&mut self) -> &mut C {
        self.session.canvas_mut()
    }

    #[must_use]
    pub fn into_canvas(self) -> C {
        self.session.into_canvas()
    }
}

#[cfg(test)]
mod tests {
    use super::SkyMapAssembler;
    use crate::core::{Star, Viewport};
    use crate::render::{MapPrimitive, RecordingCanvas, StrokePattern};
    use crate::style::EntityClass;

    #[test]
    fn finder_bounds_are_drawn_last_and_dashed() {
        let mut sky = SkyMapAssembler::new(RecordingCanvas::new(Viewport::new(400, 400)));
        sky.set_field_of_view(45.0, 12.0, 20.0);
        sky.add_stars([Star::new(1, 45.0, 12.0, 6.0)]);
        sky.set_finder_chart_bounds(45.0, 12.0, 5.0);

        let frame = sky.build_frame().expect("frame");
        let classes = frame.class_sequence();
        assert_eq!(classes.last(), Some(&EntityClass::FovIndicator));
        assert!(matches!(
            frame.primitives.last(),
            Some(MapPrimitive::Path(path))
                if matches!(path.pattern, StrokePattern::Dashed { .. })
        ));
    }

    #[test]
    fn invalid_field_fails_without_raster() {
        let mut sky = SkyMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
        sky.set_field_of_view(0.0, 0.0, 0.0);
        let outcome = sky.render_to_buffer();
        assert!(!outcome.is_success());
        assert!(sky.last_error().is_some());
        assert!(sky.last_rendered_buffer().is_none());
    }
}
