use std::f64::consts::PI;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::{debug, warn};

use crate::core::{Coord, Extent, ViewTransform, Viewport};
use crate::error::{MapError, MapResult};
use crate::io::geojson;
use crate::render::{
    BaseLayer, Canvas, Color, MapPrimitive, PathPrimitive, PointBatch, StrokePattern,
};

const LABEL_GAP_PX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub paths_drawn: usize,
    pub markers_drawn: usize,
    pub labels_drawn: usize,
    pub base_layers_drawn: usize,
    pub base_layers_skipped: usize,
}

/// Cairo + Pango + PangoCairo raster canvas with PNG output.
///
/// Pushed primitives are retained and painted onto an ARGB32 image surface
/// when a rasterize call arrives. Buffers are encoded straight into memory.
#[derive(Debug)]
pub struct CairoCanvas {
    surface: ImageSurface,
    viewport: Viewport,
    extent: Option<Extent>,
    background: Color,
    pending: Vec<MapPrimitive>,
    last_stats: CairoRenderStats,
}

impl CairoCanvas {
    pub fn new(viewport: Viewport) -> MapResult<Self> {
        let (Ok(width), Ok(height)) = (i32::try_from(viewport.width), i32::try_from(viewport.height))
        else {
            return Err(MapError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        };
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            viewport,
            extent: None,
            background: Color::WHITE,
            pending: Vec::new(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn paint(&mut self) -> MapResult<()> {
        let extent = self
            .extent
            .ok_or_else(|| MapError::MissingData("canvas extent was never set".to_owned()))?;
        let transform = ViewTransform::new(extent, self.viewport)?;
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;

        // The surface is reused; the background replaces every pixel.
        context.set_operator(cairo::Operator::Source);
        apply_color(&context, self.background);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.set_operator(cairo::Operator::Over);

        let mut stats = CairoRenderStats::default();
        for primitive in &self.pending {
            match primitive {
                MapPrimitive::BaseLayer(layer) => {
                    if draw_base_layer(&context, &transform, layer)? {
                        stats.base_layers_drawn += 1;
                    } else {
                        stats.base_layers_skipped += 1;
                    }
                }
                MapPrimitive::Path(path) => {
                    stroke_polyline(
                        &context,
                        &transform,
                        &path.points,
                        path.stroke_color,
                        path.stroke_width,
                        path.pattern,
                    )?;
                    stats.paths_drawn += 1;
                }
                MapPrimitive::Points(batch) => {
                    let (markers, labels) = draw_point_batch(&context, &transform, batch)?;
                    stats.markers_drawn += markers;
                    stats.labels_drawn += labels;
                }
            }
        }

        debug!(
            paths = stats.paths_drawn,
            markers = stats.markers_drawn,
            labels = stats.labels_drawn,
            base_layers = stats.base_layers_drawn,
            "cairo canvas painted"
        );
        self.last_stats = stats;
        Ok(())
    }
}

impl Canvas for CairoCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.extent = None;
        self.background = Color::WHITE;
        self.pending.clear();
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
        self.pending.push(MapPrimitive::Path(path.clone()));
        Ok(())
    }

    fn add_styled_points(&mut self, batch: &PointBatch) -> MapResult<()> {
        batch.validate()?;
        self.pending.push(MapPrimitive::Points(batch.clone()));
        Ok(())
    }

    fn add_base_layer(&mut self, layer: &BaseLayer) -> MapResult<()> {
        layer.validate()?;
        self.pending.push(MapPrimitive::BaseLayer(layer.clone()));
        Ok(())
    }

    fn rasterize_to_file(&mut self, path: &Path) -> MapResult<()> {
        // Encode first: a failed encode leaves nothing at `path`.
        let png = self.rasterize_to_buffer()?;
        std::fs::write(path, png).map_err(|err| MapError::io(path, err))
    }

    fn rasterize_to_buffer(&mut self) -> MapResult<Vec<u8>> {
        self.paint()?;
        let mut buffer = Vec::new();
        self.surface
            .write_to_png(&mut buffer)
            .map_err(|err| MapError::Backend(format!("failed to encode png: {err}")))?;
        Ok(buffer)
    }
}

fn stroke_polyline(
    context: &Context,
    transform: &ViewTransform,
    points: &[Coord],
    color: Color,
    width: f64,
    pattern: StrokePattern,
) -> MapResult<()> {
    let mut pixels = points.iter().map(|point| transform.to_pixel(*point));
    let Some((x, y)) = pixels.next() else {
        return Ok(());
    };

    apply_color(context, color);
    context.set_line_width(width);
    match pattern {
        StrokePattern::Solid => context.set_dash(&[], 0.0),
        StrokePattern::Dashed { on_px, off_px } => context.set_dash(&[on_px, off_px], 0.0),
    }
    context.move_to(x, y);
    for (x, y) in pixels {
        context.line_to(x, y);
    }
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke path", err))
}

fn draw_point_batch(
    context: &Context,
    transform: &ViewTransform,
    batch: &PointBatch,
) -> MapResult<(usize, usize)> {
    let font_description = FontDescription::from_string(&format!("Sans {}", batch.font_size_px));
    let mut markers = 0;
    let mut labels = 0;

    for marker in &batch.markers {
        let (x, y) = transform.to_pixel(marker.position);
        let radius = marker.size_px / 2.0;
        if radius > 0.0 {
            apply_color(context, batch.marker_color);
            context.new_sub_path();
            context.arc(x, y, radius, 0.0, 2.0 * PI);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill marker", err))?;
            markers += 1;
        }

        let Some(text) = marker.label.as_deref() else {
            continue;
        };
        let layout = pangocairo::functions::create_layout(context);
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        let (_text_width, text_height) = layout.pixel_size();

        apply_color(context, batch.label_color);
        context.move_to(x + radius + LABEL_GAP_PX, y - f64::from(text_height) / 2.0);
        pangocairo::functions::show_layout(context, &layout);
        labels += 1;
    }
    Ok((markers, labels))
}

/// Strokes a GeoJSON base layer. Returns `false` when the source is skipped.
fn draw_base_layer(
    context: &Context,
    transform: &ViewTransform,
    layer: &BaseLayer,
) -> MapResult<bool> {
    if !layer.source.exists() {
        warn!(layer = %layer.name, source = %layer.source.display(), "base layer source not found; skipping");
        return Ok(false);
    }
    if !geojson::is_geojson_source(&layer.source) {
        warn!(layer = %layer.name, source = %layer.source.display(), "unsupported base layer format; skipping");
        return Ok(false);
    }
    for outline in geojson::read_outlines(&layer.source)? {
        stroke_polyline(
            context,
            transform,
            &outline,
            layer.stroke_color,
            layer.stroke_width,
            StrokePattern::Solid,
        )?;
    }
    Ok(true)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> MapError {
    MapError::Backend(format!("{prefix}: {err}"))
}
