mod frame;
mod layer_stack;
mod layered_frame;
mod primitives;
mod recording_canvas;

pub use frame::MapFrame;
pub use layer_stack::{OverlayLayer, OverlayLayerStack};
pub use layered_frame::{LayerPrimitives, LayeredMapFrame};
pub use primitives::{
    BaseLayer, Color, MapPrimitive, PathPrimitive, PointBatch, PointMarker, StrokePattern,
};
pub use recording_canvas::RecordingCanvas;

use std::path::Path;

use tracing::{trace, warn};

use crate::core::{Extent, Viewport};
use crate::error::{MapError, MapResult};

/// Contract implemented by any rasterizing backend.
///
/// Assemblers push a fully materialized scene through these calls in paint
/// order; the backend owns drawing, spatial reference handling and encoding.
pub trait Canvas {
    fn viewport(&self) -> Viewport;

    /// Drops everything pushed since the last clear.
    fn clear(&mut self);

    fn set_extent(&mut self, extent: Extent) -> MapResult<()>;

    fn set_background(&mut self, color: Color) -> MapResult<()>;

    fn add_styled_path(&mut self, path: &PathPrimitive) -> MapResult<()>;

    fn add_styled_points(&mut self, batch: &PointBatch) -> MapResult<()>;

    fn add_base_layer(&mut self, layer: &BaseLayer) -> MapResult<()>;

    fn rasterize_to_file(&mut self, path: &Path) -> MapResult<()>;

    /// Encoded raster in memory.
    ///
    /// Backends without an in-memory encoder go through a scoped temporary
    /// file, see [`rasterize_via_temp_artifact`].
    fn rasterize_to_buffer(&mut self) -> MapResult<Vec<u8>> {
        rasterize_via_temp_artifact(self, &std::env::temp_dir())
    }
}

/// Replays `frame` onto `canvas`: clear, background, extent, then primitives
/// in order.
pub fn submit_frame<C: Canvas + ?Sized>(canvas: &mut C, frame: &MapFrame) -> MapResult<()> {
    frame.validate()?;
    canvas.clear();
    canvas.set_background(frame.background)?;
    canvas.set_extent(frame.extent)?;
    for primitive in &frame.primitives {
        match primitive {
            MapPrimitive::BaseLayer(layer) => canvas.add_base_layer(layer)?,
            MapPrimitive::Path(path) => canvas.add_styled_path(path)?,
            MapPrimitive::Points(batch) => canvas.add_styled_points(batch)?,
        }
    }
    trace!(primitives = frame.primitives.len(), "frame submitted to canvas");
    Ok(())
}

/// Rasterizes to a uniquely named file inside `dir`, reads it back and
/// removes it.
///
/// The file is removed on every exit path, including a failed rasterize or
/// read. A failed removal is logged and otherwise ignored.
pub fn rasterize_via_temp_artifact<C: Canvas + ?Sized>(
    canvas: &mut C,
    dir: &Path,
) -> MapResult<Vec<u8>> {
    let artifact = tempfile::Builder::new()
        .prefix("skymap-raster-")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|err| MapError::io(dir, err))?;
    let path = artifact.path().to_path_buf();

    canvas.rasterize_to_file(&path)?;
    let bytes = std::fs::read(&path).map_err(|err| MapError::io(&path, err))?;

    if let Err(err) = artifact.close() {
        warn!(path = %path.display(), error = %err, "failed to remove temporary raster");
    }
    Ok(bytes)
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoCanvas, CairoRenderStats};
