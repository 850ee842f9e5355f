use smallvec::SmallVec;
use tracing::trace;

use crate::core::grid::GRID_TARGET_DIVISIONS;
use crate::core::{
    CelestialScene, ConstellationBoundary, ConstellationLine, Coord, Extent, LabeledPoint,
    PathPoint, Projector, Star, StationGroups, Target, TimeMarker, Viewport, grid_lines,
    nice_grid_step,
};
use crate::render::{
    BaseLayer, LayeredMapFrame, MapFrame, OverlayLayer, PathPrimitive, PointBatch, PointMarker,
};
use crate::style::{DrawAttributes, EntityClass, StyleConfig, magnitude_marker_size};

/// Turns overlay entities into styled primitives, bucketed by draw layer.
///
/// Every entity kind has a fixed layer, so the flattened frame paints in
/// canonical order whatever order the methods are called in. Inside one
/// layer, call order is kept.
pub struct LayerCompositor<'a, S: StyleConfig + ?Sized> {
    projector: &'a dyn Projector,
    style: &'a S,
    frame: LayeredMapFrame,
}

impl<'a, S: StyleConfig + ?Sized> LayerCompositor<'a, S> {
    pub fn new(viewport: Viewport, projector: &'a dyn Projector, style: &'a S) -> Self {
        let frame = LayeredMapFrame::canonical(viewport, projector.extent(), style.background());
        Self {
            projector,
            style,
            frame,
        }
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        self.frame.extent
    }

    /// Graticule over the whole extent.
    pub fn grid(&mut self) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::Grid);
        if !attrs.visible {
            return self;
        }
        let extent = self.frame.extent;
        let step = self.style.grid_step().or_else(|| {
            nice_grid_step(extent.width().max(extent.height()), GRID_TARGET_DIVISIONS)
        });
        let Some(step) = step else {
            return self;
        };
        let lines = grid_lines(extent, step);
        trace!(step, lines = lines.len(), "grid composed");
        for line in lines {
            self.frame.push_path(
                OverlayLayer::Grid,
                styled_path(EntityClass::Grid, &attrs, line.points),
            );
        }
        self
    }

    pub fn base_layers(&mut self, layers: &[BaseLayer]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::BaseLayer);
        if !attrs.visible {
            return self;
        }
        for layer in layers {
            self.frame.push_base_layer(
                OverlayLayer::BaseMap,
                layer
                    .clone()
                    .with_stroke(attrs.stroke_color, attrs.stroke_width),
            );
        }
        self
    }

    /// Boundary outlines, plus name labels at each outline's centroid when
    /// names are enabled.
    pub fn constellation_boundaries(&mut self, boundaries: &[ConstellationBoundary]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::ConstellationBoundary);
        if attrs.visible {
            for boundary in boundaries {
                self.push_path(
                    OverlayLayer::Boundaries,
                    EntityClass::ConstellationBoundary,
                    &attrs,
                    boundary.points.iter().copied(),
                );
            }
        }

        let names = self.style.resolve(EntityClass::ConstellationName);
        if names.visible {
            let markers = boundaries
                .iter()
                .filter_map(|boundary| {
                    let label = names.label(Some(boundary.constellation.as_str()))?;
                    let anchor = boundary.label_anchor()?;
                    Some(PointMarker::new(self.projector.project(anchor), 0.0, Some(label)))
                })
                .collect();
            self.push_batch(
                OverlayLayer::Boundaries,
                EntityClass::ConstellationName,
                &names,
                markers,
            );
        }
        self
    }

    pub fn constellation_lines(&mut self, lines: &[ConstellationLine]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::ConstellationLine);
        if !attrs.visible {
            return self;
        }
        for line in lines {
            self.push_path(
                OverlayLayer::ConnectingLines,
                EntityClass::ConstellationLine,
                &attrs,
                [line.start, line.end],
            );
        }
        self
    }

    /// Northern then southern 1-sigma limit.
    pub fn sigma_limits(&mut self, northern: &[PathPoint], southern: &[PathPoint]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::SigmaLimit);
        if !attrs.visible {
            return self;
        }
        for limit in [northern, southern] {
            self.push_path(
                OverlayLayer::SecondaryPaths,
                EntityClass::SigmaLimit,
                &attrs,
                limit.iter().map(|point| point.position),
            );
        }
        self
    }

    pub fn gps_tracks(&mut self, tracks: &[Vec<LabeledPoint>]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::GpsTrack);
        if !attrs.visible {
            return self;
        }
        for track in tracks {
            self.push_path(
                OverlayLayer::SecondaryPaths,
                EntityClass::GpsTrack,
                &attrs,
                track.iter().map(|point| point.position),
            );
        }
        self
    }

    pub fn central_line(&mut self, line: &[PathPoint]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::CentralLine);
        if attrs.visible {
            self.push_path(
                OverlayLayer::PrimaryPath,
                EntityClass::CentralLine,
                &attrs,
                line.iter().map(|point| point.position),
            );
        }
        self
    }

    /// Trajectory polyline plus one tick per vertex, labelled by timestamp.
    pub fn trajectory(&mut self, target: &Target) -> &mut Self {
        if target.trajectory.is_empty() {
            return self;
        }
        let attrs = self.style.resolve(EntityClass::Trajectory);
        if attrs.visible {
            self.push_path(
                OverlayLayer::PrimaryPath,
                EntityClass::Trajectory,
                &attrs,
                target.trajectory.iter().copied(),
            );
        }

        let ticks = self.style.resolve(EntityClass::TrajectoryTick);
        if ticks.visible {
            let markers = target
                .labeled_trajectory()
                .map(|(point, label)| {
                    PointMarker::new(
                        self.projector.project(point),
                        ticks.marker_size,
                        ticks.label(label),
                    )
                })
                .collect();
            self.push_batch(
                OverlayLayer::PointMarkers,
                EntityClass::TrajectoryTick,
                &ticks,
                markers,
            );
        }
        self
    }

    /// Star markers, sized by brightness when the style asks for it.
    pub fn stars<'s, I>(&mut self, stars: I, magnitude_limit: f64) -> &mut Self
    where
        I: IntoIterator<Item = &'s Star>,
    {
        let attrs = self.style.resolve(EntityClass::Star);
        if !attrs.visible {
            return self;
        }
        let scaled = self.style.scales_by_magnitude();
        let markers = stars
            .into_iter()
            .map(|star| {
                let size = if scaled {
                    magnitude_marker_size(attrs.marker_size, star.magnitude, magnitude_limit)
                } else {
                    attrs.marker_size
                };
                let designation = star.designation();
                PointMarker::new(
                    self.projector.project(star.position),
                    size,
                    attrs.label(Some(designation.as_str())),
                )
            })
            .collect();
        self.push_batch(OverlayLayer::PointMarkers, EntityClass::Star, &attrs, markers);
        self
    }

    pub fn time_markers(&mut self, markers: &[TimeMarker]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::TimeMarker);
        if !attrs.visible {
            return self;
        }
        let markers = markers
            .iter()
            .map(|marker| {
                PointMarker::new(
                    self.projector.project(marker.position),
                    attrs.marker_size,
                    attrs.label(Some(marker.time_utc.as_str())),
                )
            })
            .collect();
        self.push_batch(
            OverlayLayer::PointMarkers,
            EntityClass::TimeMarker,
            &attrs,
            markers,
        );
        self
    }

    /// One batch per non-empty station group: positive, negative, other.
    pub fn stations(&mut self, groups: &StationGroups<'_>) -> &mut Self {
        for (kind, stations) in groups.in_draw_order() {
            let class = EntityClass::Station(kind);
            let attrs = self.style.resolve(class);
            if !attrs.visible {
                continue;
            }
            let markers = stations
                .iter()
                .map(|station| {
                    PointMarker::new(
                        self.projector.project(station.position),
                        attrs.marker_size,
                        attrs.label(Some(station.name.as_str())),
                    )
                })
                .collect();
            self.push_batch(OverlayLayer::PointMarkers, class, &attrs, markers);
        }
        self
    }

    pub fn gps_points(&mut self, points: &[LabeledPoint]) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::GpsPoint);
        if !attrs.visible {
            return self;
        }
        let markers = points
            .iter()
            .map(|point| {
                PointMarker::new(
                    self.projector.project(point.position),
                    attrs.marker_size,
                    attrs.label(point.label_text()),
                )
            })
            .collect();
        self.push_batch(
            OverlayLayer::PointMarkers,
            EntityClass::GpsPoint,
            &attrs,
            markers,
        );
        self
    }

    /// Highlight marker and name label. An unnamed target draws nothing.
    pub fn target(&mut self, target: &Target) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::Target);
        if !attrs.visible || !target.is_set() {
            return self;
        }
        let marker = PointMarker::new(
            self.projector.project(target.position),
            attrs.marker_size,
            attrs.label(Some(target.name.as_str())),
        );
        self.push_batch(
            OverlayLayer::Highlight,
            EntityClass::Target,
            &attrs,
            vec![marker],
        );
        self
    }

    /// Dashed outline of `bounds`.
    pub fn field_of_view(&mut self, bounds: Extent) -> &mut Self {
        let attrs = self.style.resolve(EntityClass::FovIndicator);
        if attrs.visible {
            self.push_path(
                OverlayLayer::FieldOfViewIndicator,
                EntityClass::FovIndicator,
                &attrs,
                bounds.outline(),
            );
        }
        self
    }

    /// Full celestial scene: grid, boundaries, asterisms, trajectory, the
    /// stars that pass the field and magnitude tests, then the target.
    pub fn celestial_scene(&mut self, scene: &CelestialScene) -> &mut Self {
        self.grid()
            .constellation_boundaries(&scene.constellation_boundaries)
            .constellation_lines(&scene.constellation_lines)
            .trajectory(&scene.target)
            .stars(scene.visible_stars(), scene.filter.magnitude_limit)
            .target(&scene.target)
    }

    #[must_use]
    pub fn finish(self) -> MapFrame {
        self.frame.flatten()
    }

    fn push_path<I>(&mut self, layer: OverlayLayer, class: EntityClass, attrs: &DrawAttributes, points: I)
    where
        I: IntoIterator<Item = Coord>,
    {
        let projected: SmallVec<[Coord; 4]> = points
            .into_iter()
            .map(|point| self.projector.project(point))
            .collect();
        if projected.len() < 2 {
            trace!(?class, points = projected.len(), "path too short to draw");
            return;
        }
        self.frame.push_path(layer, styled_path(class, attrs, projected));
    }

    fn push_batch(
        &mut self,
        layer: OverlayLayer,
        class: EntityClass,
        attrs: &DrawAttributes,
        markers: Vec<PointMarker>,
    ) {
        let markers: Vec<PointMarker> = markers
            .into_iter()
            .filter(|marker| marker.size_px > 0.0 || marker.label.is_some())
            .collect();
        let batch = PointBatch::new(class, attrs.marker_color(), attrs.label_color, attrs.font_size)
            .with_markers(markers);
        self.frame.push_points(layer, batch);
    }
}

fn styled_path<I>(class: EntityClass, attrs: &DrawAttributes, points: I) -> PathPrimitive
where
    I: IntoIterator<Item = Coord>,
{
    PathPrimitive::new(class, points, attrs.stroke_color, attrs.stroke_width)
        .with_pattern(attrs.pattern)
}
