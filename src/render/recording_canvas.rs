use std::path::Path;

use crate::core::{Extent, Viewport};
use crate::error::{MapError, MapResult};
use crate::render::{BaseLayer, Canvas, Color, MapFrame, MapPrimitive, PathPrimitive, PointBatch};

/// Headless canvas that records every call.
///
/// It validates what it receives so tests catch bad geometry without a
/// raster backend. "Rasterizing" writes the recorded scene as JSON.
#[derive(Debug)]
pub struct RecordingCanvas {
    viewport: Viewport,
    extent: Option<Extent>,
    background: Color,
    primitives: Vec<MapPrimitive>,
    fail_on_rasterize: bool,
    rasterize_count: usize,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            extent: None,
            background: Color::WHITE,
            primitives: Vec::new(),
            fail_on_rasterize: false,
            rasterize_count: 0,
        }
    }

    /// Makes every following rasterize call fail with a backend error.
    pub fn set_fail_on_rasterize(&mut self, fail: bool) {
        self.fail_on_rasterize = fail;
    }

    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    #[must_use]
    pub fn primitives(&self) -> &[MapPrimitive] {
        &self.primitives
    }

    #[must_use]
    pub fn rasterize_count(&self) -> usize {
        self.rasterize_count
    }

    /// Recorded scene as a frame; `None` before an extent was set.
    #[must_use]
    pub fn recorded_frame(&self) -> Option<MapFrame> {
        let extent = self.extent?;
        Some(MapFrame {
            viewport: self.viewport,
            extent,
            background: self.background,
            primitives: self.primitives.clone(),
        })
    }

    fn encode(&mut self) -> MapResult<Vec<u8>> {
        if self.fail_on_rasterize {
            return Err(MapError::Backend("recording canvas set to fail".to_owned()));
        }
        let frame = self
            .recorded_frame()
            .ok_or_else(|| MapError::MissingData("canvas extent was never set".to_owned()))?;
        self.rasterize_count += 1;
        serde_json::to_vec(&frame).map_err(|err| MapError::Backend(err.to_string()))
    }
}

impl Canvas for RecordingCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.extent = None;
        self.background = Color::WHITE;
        self.primitives.clear();
    }

    fn set_extent(&mut self, extent: Extent) -> MapResult<()> {
        extent.validate()?;
        self.extent = Some(extent);
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> MapResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    fn add_styled_path(&mut self, path: &PathPrimitive) -> MapResult<()> {
        path.validate()?;
        self.primitives.push(MapPrimitive::Path(path.clone()));
        Ok(())
    }

    fn add_styled_points(&mut self, batch: &PointBatch) -> MapResult<()> {
        batch.validate()?;
        self.primitives.push(MapPrimitive::Points(batch.clone()));
        Ok(())
    }

    fn add_base_layer(&mut self, layer: &BaseLayer) -> MapResult<()> {
        layer.validate()?;
        self.primitives.push(MapPrimitive::BaseLayer(layer.clone()));
        Ok(())
    }

    fn rasterize_to_file(&mut self, path: &Path) -> MapResult<()> {
        let bytes = self.encode()?;
        std::fs::write(path, bytes).map_err(|err| MapError::io(path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingCanvas;
    use crate::core::{Coord, Extent, Viewport};
    use crate::render::{Canvas, Color, MapFrame, PathPrimitive, rasterize_via_temp_artifact};
    use crate::style::EntityClass;

    fn prepared_canvas() -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(Viewport::new(64, 32));
        canvas
            .set_extent(Extent::new(0.0, 0.0, 4.0, 2.0).expect("extent"))
            .expect("set extent");
        canvas
            .add_styled_path(&PathPrimitive::new(
                EntityClass::GpsTrack,
                [Coord::new(0.5, 0.5), Coord::new(3.5, 1.5)],
                Color::BLACK,
                2.0,
            ))
            .expect("path");
        canvas
    }

    #[test]
    fn buffer_holds_the_recorded_scene() {
        let mut canvas = prepared_canvas();
        let bytes = canvas.rasterize_to_buffer().expect("buffer");
        let frame: MapFrame = serde_json::from_slice(&bytes).expect("decode");
        assert_eq!(frame.viewport, Viewport::new(64, 32));
        assert_eq!(frame.path_count(), 1);
        assert_eq!(canvas.rasterize_count(), 1);
    }

    #[test]
    fn temp_artifact_is_removed_when_rasterize_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut canvas = prepared_canvas();
        canvas.set_fail_on_rasterize(true);

        assert!(rasterize_via_temp_artifact(&mut canvas, dir.path()).is_err());
        let leftovers = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn invalid_path_is_rejected_at_push() {
        let mut canvas = RecordingCanvas::new(Viewport::new(10, 10));
        let degenerate = PathPrimitive::new(
            EntityClass::Trajectory,
            [Coord::new(0.0, 0.0)],
            Color::BLACK,
            1.0,
        );
        assert!(canvas.add_styled_path(&degenerate).is_err());
        assert!(canvas.primitives().is_empty());
    }
}
