use serde::{Deserialize, Serialize};

use crate::core::extent::Extent;
use crate::core::projection::TangentPlaneProjector;
use crate::core::types::Coord;
use crate::error::{MapError, MapResult};

/// Catalog star (SAO numbering). Lower magnitude means brighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub catalog_number: u32,
    pub position: Coord,
    pub magnitude: f64,
    pub spectral_class: String,
}

impl Star {
    #[must_use]
    pub fn new(catalog_number: u32, ra_deg: f64, dec_deg: f64, magnitude: f64) -> Self {
        Self {
            catalog_number,
            position: Coord::new(ra_deg, dec_deg),
            magnitude,
            spectral_class: String::new(),
        }
    }

    #[must_use]
    pub fn with_spectral_class(mut self, spectral_class: impl Into<String>) -> Self {
        self.spectral_class = spectral_class.into();
        self
    }

    #[must_use]
    pub fn designation(&self) -> String {
        format!("SAO {}", self.catalog_number)
    }
}

/// Asterism segment between two stars. No topology is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationLine {
    pub start: Coord,
    pub end: Coord,
    pub constellation: String,
}

impl ConstellationLine {
    #[must_use]
    pub fn new(start: Coord, end: Coord, constellation: impl Into<String>) -> Self {
        Self {
            start,
            end,
            constellation: constellation.into(),
        }
    }
}

/// Constellation boundary polygon.
///
/// Boundaries should be closed (first vertex repeated last) but this is not
/// enforced; an open boundary is drawn as an open polyline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstellationBoundary {
    pub points: Vec<Coord>,
    pub constellation: String,
}

impl ConstellationBoundary {
    #[must_use]
    pub fn new(points: Vec<Coord>, constellation: impl Into<String>) -> Self {
        Self {
            points,
            constellation: constellation.into(),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Mean of the distinct vertices, used to anchor the constellation name.
    #[must_use]
    pub fn label_anchor(&self) -> Option<Coord> {
        let vertices = if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points[..]
        };
        if vertices.is_empty() {
            return None;
        }
        let count = vertices.len() as f64;
        let (sum1, sum2) = vertices
            .iter()
            .fold((0.0, 0.0), |(a, b), p| (a + p.axis1, b + p.axis2));
        Some(Coord::new(sum1 / count, sum2 / count))
    }
}

/// Highlighted object (asteroid, star) with an optional ephemeris track.
///
/// `trajectory_timestamps` labels trajectory vertices by index; vertices
/// past the end of the timestamp list are unlabeled. Chronological order is
/// not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub position: Coord,
    pub magnitude: f64,
    pub trajectory: Vec<Coord>,
    pub trajectory_timestamps: Vec<String>,
}

impl Target {
    #[must_use]
    pub fn new(name: impl Into<String>, ra_deg: f64, dec_deg: f64, magnitude: f64) -> Self {
        Self {
            name: name.into(),
            position: Coord::new(ra_deg, dec_deg),
            magnitude,
            trajectory: Vec::new(),
            trajectory_timestamps: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_trajectory(mut self, trajectory: Vec<Coord>, timestamps: Vec<String>) -> Self {
        self.trajectory = trajectory;
        self.trajectory_timestamps = timestamps;
        self
    }

    /// An unnamed target is treated as "no target".
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }

    /// Trajectory vertices paired with their timestamp label, if any.
    pub fn labeled_trajectory(&self) -> impl Iterator<Item = (Coord, Option<&str>)> + '_ {
        self.trajectory.iter().enumerate().map(|(index, point)| {
            let label = self
                .trajectory_timestamps
                .get(index)
                .map(String::as_str)
                .filter(|label| !label.is_empty());
            (*point, label)
        })
    }
}

/// Square field of view: centre plus a span on both axes.
///
/// Serves as the celestial view extent and as the star inclusion test. The
/// inclusion test is axis-aligned and inclusive on the edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub center: Coord,
    pub span: f64,
}

impl FieldOfView {
    pub const DEFAULT_SPAN_DEG: f64 = 60.0;

    #[must_use]
    pub fn new(center: Coord, span: f64) -> Self {
        Self { center, span }
    }

    pub fn validate(self) -> MapResult<Self> {
        if !self.center.is_finite() {
            return Err(MapError::InvalidData(
                "field of view centre must be finite".to_owned(),
            ));
        }
        if !self.span.is_finite() || self.span <= 0.0 {
            return Err(MapError::InvalidData(
                "field of view span must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Bounds are `centre ± span/2`, computed exactly as [`Extent::centered`]
    /// does, so a star on the drawn edge is kept.
    #[must_use]
    pub fn contains(self, point: Coord) -> bool {
        let half = self.span / 2.0;
        (self.center.axis1 - half..=self.center.axis1 + half).contains(&point.axis1)
            && (self.center.axis2 - half..=self.center.axis2 + half).contains(&point.axis2)
    }

    pub fn extent(self) -> MapResult<Extent> {
        Extent::centered(self.center, self.span)
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::new(Coord::new(0.0, 0.0), Self::DEFAULT_SPAN_DEG)
    }
}

/// Magnitude cut-off: stars fainter than the limit are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarFilter {
    pub magnitude_limit: f64,
}

impl StarFilter {
    pub const DEFAULT_MAGNITUDE_LIMIT: f64 = 12.0;

    #[must_use]
    pub fn new(magnitude_limit: f64) -> Self {
        Self { magnitude_limit }
    }

    /// `magnitude == limit` is kept; anything strictly fainter is not.
    #[must_use]
    pub fn admits_magnitude(self, magnitude: f64) -> bool {
        magnitude <= self.magnitude_limit
    }

    #[must_use]
    pub fn admits(self, star: &Star, field: FieldOfView) -> bool {
        self.admits_magnitude(star.magnitude) && field.contains(star.position)
    }

    pub fn visible<'a>(
        self,
        stars: &'a [Star],
        field: FieldOfView,
    ) -> impl Iterator<Item = &'a Star> + 'a {
        stars.iter().filter(move |star| self.admits(star, field))
    }
}

impl Default for StarFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAGNITUDE_LIMIT)
    }
}

/// Everything a celestial chart draws: field, magnitude cut-off, catalog
/// stars, asterisms, boundaries and the highlighted target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CelestialScene {
    pub field: FieldOfView,
    pub filter: StarFilter,
    pub stars: Vec<Star>,
    pub constellation_lines: Vec<ConstellationLine>,
    pub constellation_boundaries: Vec<ConstellationBoundary>,
    pub target: Target,
}

impl CelestialScene {
    pub fn projector(&self) -> MapResult<TangentPlaneProjector> {
        let field = self.field.validate()?;
        TangentPlaneProjector::new(field.center, field.span)
    }

    /// Stars passing both the magnitude and the field test, input order kept.
    pub fn visible_stars(&self) -> impl Iterator<Item = &Star> + '_ {
        self.filter.visible(&self.stars, self.field)
    }

    /// Drops stars, lines, boundaries and target; keeps field and limit.
    pub fn clear_overlays(&mut self) {
        self.stars.clear();
        self.constellation_lines.clear();
        self.constellation_boundaries.clear();
        self.target = Target::default();
    }
}
