use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{Coord, Extent, ExtentCalculator, GeographicProjector, LabeledPoint, Viewport};
use crate::error::{MapError, MapResult};
use crate::render::{BaseLayer, Canvas, Color, MapFrame};
use crate::style::PathMapStyle;

use super::render_session::RenderSession;
use super::{LayerCompositor, RenderOutcome};

/// Geographic map of GPS tracks and labelled fixes over optional base layers.
#[derive(Debug)]
pub struct PathMapAssembler<C: Canvas> {
    session: RenderSession<C>,
    tracks: Vec<Vec<LabeledPoint>>,
    points: Vec<LabeledPoint>,
    base_layers: Vec<BaseLayer>,
    extent: Option<Extent>,
    style: PathMapStyle,
}

impl<C: Canvas> PathMapAssembler<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            session: RenderSession::new(canvas),
            tracks: Vec::new(),
            points: Vec::new(),
            base_layers: Vec::new(),
            extent: None,
            style: PathMapStyle::default(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.session.viewport()
    }

    /// Explicit view box in degrees. Overrides the automatic extent.
    pub fn set_extent(
        &mut self,
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    ) -> MapResult<()> {
        self.extent = Some(Extent::new(min_lon, min_lat, max_lon, max_lat)?);
        Ok(())
    }

    pub fn clear_extent(&mut self) {
        self.extent = None;
    }

    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Vector overlay drawn under the tracks. Only GeoJSON sources are
    /// drawn by the bundled canvases; other formats are skipped at render.
    pub fn add_base_layer(&mut self, source: impl Into<PathBuf>, name: impl Into<String>) {
        self.base_layers.push(BaseLayer::new(name, source));
    }

    pub fn add_gps_path(&mut self, points: impl IntoIterator<Item = LabeledPoint>) {
        let track: Vec<LabeledPoint> = points.into_iter().collect();
        debug!(points = track.len(), "gps track added");
        self.tracks.push(track);
    }

    pub fn add_point_labels(&mut self, points: impl IntoIterator<Item = LabeledPoint>) {
        self.points.extend(points);
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.style.background_color = color;
    }

    pub fn set_style(&mut self, style: PathMapStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn style(&self) -> &PathMapStyle {
        &self.style
    }

    #[must_use]
    pub fn tracks(&self) -> &[Vec<LabeledPoint>] {
        &self.tracks
    }

    #[must_use]
    pub fn points(&self) -> &[LabeledPoint] {
        &self.points
    }

    /// Fits the extent to `points` with `margin_percent` padding per side
    /// and a 0.1° floor, and keeps it as the explicit extent.
    pub fn auto_extent_from_points(
        &mut self,
        points: &[LabeledPoint],
        margin_percent: f64,
    ) -> MapResult<Extent> {
        let extent = ExtentCalculator::path_map()
            .with_margin_percent(margin_percent)
            .compute(points.iter().map(|point| point.position))?;
        self.extent = Some(extent);
        Ok(extent)
    }

    /// Fits the extent to every track vertex and labelled point.
    pub fn auto_extent(&mut self, margin_percent: f64) -> MapResult<Extent> {
        if self.data_coords().next().is_none() {
            return Err(MapError::MissingData(
                "path map has no tracks or points to fit".to_owned(),
            ));
        }
        let extent = ExtentCalculator::path_map()
            .with_margin_percent(margin_percent)
            .compute(self.data_coords())?;
        self.extent = Some(extent);
        Ok(extent)
    }

    pub fn build_frame(&self) -> MapResult<MapFrame> {
        let extent = match self.extent {
            Some(extent) => extent,
            None if self.data_coords().next().is_some() => {
                ExtentCalculator::path_map().compute(self.data_coords())?
            }
            None => {
                return Err(MapError::MissingData(
                    "path map has no extent and no data to derive one".to_owned(),
                ));
            }
        };
        let projector = GeographicProjector::new(extent);
        let mut compositor = LayerCompositor::new(self.viewport(), &projector, &self.style);
        compositor
            .grid()
            .base_layers(&self.base_layers)
            .gps_tracks(&self.tracks)
            .gps_points(&self.points);
        let frame = compositor.finish();
        debug!(
            tracks = self.tracks.len(),
            points = self.points.len(),
            primitives = frame.primitives.len(),
            "path map composed"
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

    fn data_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tracks
            .iter()
            .flatten()
            .chain(&self.points)
            .map(|point| point.position)
    }
}

#[cfg(test)]
mod tests {
    use super::PathMapAssembler;
    use crate::core::{LabeledPoint, Viewport};
    use crate::error::MapError;
    use crate::render::RecordingCanvas;

    #[test]
    fn frame_without_data_or_extent_is_missing_data() {
        let map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(64, 64)));
        assert!(matches!(map.build_frame(), Err(MapError::MissingData(_))));
    }

    #[test]
    fn explicit_extent_wins_over_data_bounds() {
        let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(64, 64)));
        map.add_gps_path([LabeledPoint::new(12.0, 41.0), LabeledPoint::new(12.5, 41.5)]);
        map.set_extent(6.0, 36.0, 19.0, 47.0).expect("extent");
        let frame = map.build_frame().expect("frame");
        assert_eq!(frame.extent.min1, 6.0);
        assert_eq!(frame.extent.max2, 47.0);
    }

    #[test]
    fn inverted_extent_is_rejected() {
        let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(64, 64)));
        assert!(map.set_extent(10.0, 0.0, 5.0, 1.0).is_err());
        assert!(map.extent().is_none());
    }
}
