pub mod extent;
pub mod grid;
pub mod occultation;
pub mod projection;
pub mod sky;
pub mod types;

pub use extent::{Extent, ExtentCalculator};
pub use grid::{GridLine, grid_lines, nice_grid_step};
pub use occultation::{
    ObservationStation, OccultationEvent, PathPoint, StationGroupKind, StationGroups, StationStatus,
    TimeMarker,
};
pub use projection::{GeographicProjector, Projector, TangentPlaneProjector, ViewTransform};
pub use sky::{
    CelestialScene, ConstellationBoundary, ConstellationLine, FieldOfView, Star, StarFilter,
    Target,
};
pub use types::{Coord, LabeledPoint, Viewport};
