use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::core::Viewport;
use crate::error::{MapError, MapResult};
use crate::render::{Canvas, MapFrame, submit_frame};

use super::{HtmlReport, RenderOutcome};

/// Canvas owned by one assembler plus the outcome of its latest render.
#[derive(Debug)]
pub(crate) struct RenderSession<C: Canvas> {
    canvas: C,
    last_error: Option<String>,
    last_raster: Option<Vec<u8>>,
}

impl<C: Canvas> RenderSession<C> {
    pub(crate) fn new(canvas: C) -> Self {
        Self {
            canvas,
            last_error: None,
            last_raster: None,
        }
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.canvas.viewport()
    }

    pub(crate) fn canvas(&self) -> &C {
        &self.canvas
    }

    pub(crate) fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub(crate) fn into_canvas(self) -> C {
        self.canvas
    }

    /// Renders to `path`. The written file is also kept as the latest raster.
    pub(crate) fn render_to_file(&mut self, frame: MapResult<MapFrame>, path: &Path) -> RenderOutcome {
        let result = frame.and_then(|frame| {
            submit_frame(&mut self.canvas, &frame)?;
            self.canvas.rasterize_to_file(path)?;
            std::fs::read(path).map_err(|err| MapError::io(path, err))
        });
        self.finish(result, false)
    }

    pub(crate) fn render_to_buffer(&mut self, frame: MapResult<MapFrame>) -> RenderOutcome {
        let result = frame.and_then(|frame| {
            submit_frame(&mut self.canvas, &frame)?;
            self.canvas.rasterize_to_buffer()
        });
        self.finish(result, true)
    }

    /// Renders to memory and writes `report` with the PNG embedded.
    pub(crate) fn export_html(
        &mut self,
        frame: MapResult<MapFrame>,
        path: &Path,
        report: HtmlReport,
    ) -> RenderOutcome {
        let outcome = self.render_to_buffer(frame);
        let Some(png) = outcome.raster() else {
            return outcome;
        };
        match report.with_png(png).write_to(path) {
            Ok(()) => {
                debug!(path = %path.display(), "html report written");
                outcome
            }
            Err(err) => {
                warn!(error = %err, "html export failed");
                self.last_error = Some(err.to_string());
                self.last_raster = None;
                RenderOutcome::failed(&err)
            }
        }
    }

    fn finish(&mut self, result: MapResult<Vec<u8>>, attach_raster: bool) -> RenderOutcome {
        match result {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "render finished");
                self.last_error = None;
                self.last_raster = Some(bytes);
                RenderOutcome::succeeded(if attach_raster {
                    self.last_raster.clone()
                } else {
                    None
                })
            }
            Err(err) => {
                warn!(error = %err, "render failed");
                self.last_error = Some(err.to_string());
                self.last_raster = None;
                RenderOutcome::failed(&err)
            }
        }
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn last_rendered_buffer(&self) -> Option<&[u8]> {
        self.last_raster.as_deref()
    }

    pub(crate) fn last_rendered_image_base64(&self) -> String {
        self.last_raster
            .as_deref()
            .map(|bytes| STANDARD.encode(bytes))
            .unwrap_or_default()
    }
}
