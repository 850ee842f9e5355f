use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::{Extent, ExtentCalculator, GeographicProjector, OccultationEvent, Viewport};
use crate::error::{MapError, MapResult};
use crate::io::{LoadReport, read_occultation_event};
use crate::render::{BaseLayer, Canvas, MapFrame};
use crate::style::{OccultationStyle, StyleConfig};

use super::render_session::RenderSession;
use super::{HtmlReport, LayerCompositor, RenderOutcome};

/// Natural Earth 1:50m country and coastline layers under `dir`.
#[must_use]
pub fn natural_earth_base_layers(dir: impl AsRef<Path>) -> Vec<BaseLayer> {
    let dir = dir.as_ref();
    vec![
        BaseLayer::new("countries", dir.join("ne_50m_admin_0_countries.shp")),
        BaseLayer::new("coastline", dir.join("ne_50m_coastline.shp")),
    ]
}

/// Geographic map of an occultation shadow path with observer reports.
#[derive(Debug)]
pub struct OccultationMapAssembler<C: Canvas> {
    session: RenderSession<C>,
    event: OccultationEvent,
    style: OccultationStyle,
    base_layers: Vec<BaseLayer>,
}

impl<C: Canvas> OccultationMapAssembler<C> {
    /// New assembler with the Natural Earth layers expected under
    /// `./data/naturalearth`.
    pub fn new(canvas: C) -> Self {
        Self {
            session: RenderSession::new(canvas),
            event: OccultationEvent::default(),
            style: OccultationStyle::default(),
            base_layers: natural_earth_base_layers(PathBuf::from("data").join("naturalearth")),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.session.viewport()
    }

    /// Replaces the event from an occultation document.
    ///
    /// Returns `false` and keeps the current event when the file cannot be
    /// read or is not a JSON object.
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> bool {
        match self.load_from_json_with_report(path) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "occultation load failed");
                false
            }
        }
    }

    pub fn load_from_json_with_report(&mut self, path: impl AsRef<Path>) -> MapResult<LoadReport> {
        let (event, report) = read_occultation_event(path.as_ref())?;
        info!(
            event = %event.event_id,
            central_points = event.central_line.len(),
            stations = event.stations.len(),
            issues = report.issue_count(),
            "occultation event loaded"
        );
        self.event = event;
        Ok(report)
    }

    pub fn set_occultation_data(&mut self, event: OccultationEvent) {
        self.event = event;
    }

    #[must_use]
    pub fn event(&self) -> &OccultationEvent {
        &self.event
    }

    pub fn set_style(&mut self, style: OccultationStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn style(&self) -> &OccultationStyle {
        &self.style
    }

    pub fn set_base_layers(&mut self, layers: Vec<BaseLayer>) {
        self.base_layers = layers;
    }

    #[must_use]
    pub fn base_layers(&self) -> &[BaseLayer] {
        &self.base_layers
    }

    /// Padded bounding box of the central line and both limits.
    ///
    /// Frames are composed with
    /// [`ExtentCalculator::OCCULTATION_MARGIN_PERCENT`]; the 0.5° floor
    /// applies whatever the margin.
    pub fn auto_calculate_extent(&self, margin_percent: f64) -> MapResult<Extent> {
        ExtentCalculator::occultation()
            .with_margin_percent(margin_percent)
            .compute(self.event.path_coords())
    }

    pub fn build_frame(&self, include_base_layers: bool) -> MapResult<MapFrame> {
        if self.event.central_line.is_empty() {
            return Err(MapError::MissingData(
                "occultation event has no central line".to_owned(),
            ));
        }
        let extent = self.auto_calculate_extent(ExtentCalculator::OCCULTATION_MARGIN_PERCENT)?;
        let projector = GeographicProjector::new(extent);
        let groups = self.event.station_groups();

        let mut compositor = LayerCompositor::new(self.viewport(), &projector, &self.style);
        compositor.grid();
        if include_base_layers {
            compositor.base_layers(&self.base_layers);
        }
        compositor
            .sigma_limits(&self.event.northern_limit, &self.event.southern_limit)
            .central_line(&self.event.central_line)
            .time_markers(&self.event.time_markers)
            .stations(&groups);
        let frame = compositor.finish();
        debug!(
            event = %self.event.event_id,
            min_lon = extent.min1,
            min_lat = extent.min2,
            max_lon = extent.max1,
            max_lat = extent.max2,
            primitives = frame.primitives.len(),
            "occultation map composed"
        );
        Ok(frame)
    }

    pub fn render_to_file(
        &mut self,
        path: impl AsRef<Path>,
        include_base_layers: bool,
    ) -> RenderOutcome {
        let frame = self.build_frame(include_base_layers);
        self.session.render_to_file(frame, path.as_ref())
    }

    pub fn render_to_buffer(&mut self, include_base_layers: bool) -> RenderOutcome {
        let frame = self.build_frame(include_base_layers);
        self.session.render_to_buffer(frame)
    }

    /// Self-contained HTML page with the event summary, the map and a legend.
    pub fn export_html(&mut self, path: impl AsRef<Path>, title: &str) -> RenderOutcome {
        let event = &self.event;
        let utc = event.event_time().map_or_else(
            || event.time_utc.clone(),
            |time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        let report = HtmlReport::new(title)
            .with_row("Event", event.event_id.clone())
            .with_row("Body", event.body_name.clone())
            .with_row("Star", event.star_id.clone())
            .with_row("UTC time", utc)
            .with_row("Duration", format!("{:.1} s", event.duration_seconds))
            .with_row("Magnitude drop", format!("{:.2}", event.magnitude_drop))
            .with_legend(self.style.legend());
        let frame = self.build_frame(true);
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

#[cfg(test)]
mod tests {
    use super::{OccultationMapAssembler, natural_earth_base_layers};
    use crate::core::{
        ExtentCalculator, ObservationStation, OccultationEvent, PathPoint, StationGroupKind,
        Viewport,
    };
    use crate::error::MapError;
    use crate::render::RecordingCanvas;
    use crate::style::EntityClass;

    fn event() -> OccultationEvent {
        OccultationEvent {
            event_id: "20251128_17030".to_owned(),
            central_line: vec![
                PathPoint::new(10.0, 40.0, "18:44:50"),
                PathPoint::new(12.0, 42.0, "18:45:00"),
            ],
            northern_limit: vec![
                PathPoint::new(10.0, 40.5, ""),
                PathPoint::new(12.0, 42.5, ""),
            ],
            southern_limit: vec![
                PathPoint::new(10.0, 39.5, ""),
                PathPoint::new(12.0, 41.5, ""),
            ],
            stations: vec![
                ObservationStation::new("Roma", 12.5, 41.9, "negative"),
                ObservationStation::new("Napoli", 14.2, 40.8, "positive"),
            ],
            ..OccultationEvent::default()
        }
    }

    #[test]
    fn frame_follows_draw_order_and_skips_base_layers_on_request() {
        let mut map = OccultationMapAssembler::new(RecordingCanvas::new(Viewport::new(800, 600)));
        map.set_occultation_data(event());
        let classes = map.build_frame(false).expect("frame").class_sequence();
        let first_limit = classes
            .iter()
            .position(|class| *class == EntityClass::SigmaLimit)
            .expect("limits");
        let central = classes
            .iter()
            .position(|class| *class == EntityClass::CentralLine)
            .expect("central");
        assert!(first_limit < central);
        assert!(!classes.contains(&EntityClass::BaseLayer));
        assert_eq!(
            &classes[classes.len() - 2..],
            &[
                EntityClass::Station(StationGroupKind::Positive),
                EntityClass::Station(StationGroupKind::Negative),
            ]
        );

        let with_base = map.build_frame(true).expect("frame").class_sequence();
        assert_eq!(
            with_base
                .iter()
                .filter(|class| **class == EntityClass::BaseLayer)
                .count(),
            2
        );
    }

    #[test]
    fn extent_margin_is_chosen_by_the_caller() {
        let mut map = OccultationMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
        map.set_occultation_data(event());

        // Lon spans 2° and lat spans 3°, so 15 % stays under the 0.5° floor.
        let default = map
            .auto_calculate_extent(ExtentCalculator::OCCULTATION_MARGIN_PERCENT)
            .expect("extent");
        assert!((default.min1 - 9.5).abs() < 1e-9);
        assert!((default.max2 - 43.0).abs() < 1e-9);

        let wide = map.auto_calculate_extent(50.0).expect("extent");
        assert!((wide.min1 - 9.0).abs() < 1e-9);
        assert!((wide.max1 - 13.0).abs() < 1e-9);
        assert!((wide.min2 - 38.0).abs() < 1e-9);
    }

    #[test]
    fn empty_central_line_is_missing_data() {
        let map = OccultationMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
        assert!(matches!(map.build_frame(true), Err(MapError::MissingData(_))));
    }

    #[test]
    fn natural_earth_layers_point_into_the_directory() {
        let layers = natural_earth_base_layers("/srv/ne");
        assert_eq!(layers[0].name, "countries");
        assert!(layers[1].source.ends_with("ne_50m_coastline.shp"));
    }
}
