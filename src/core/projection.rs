use crate::core::extent::Extent;
use crate::core::types::{Coord, Viewport};
use crate::error::{MapError, MapResult};

/// Maps domain coordinates into the backend's extent space.
pub trait Projector {
    /// Projects one domain coordinate into extent space.
    fn project(&self, point: Coord) -> Coord;

    /// Declared view extent in the same space `project` maps into.
    fn extent(&self) -> Extent;
}

/// WGS84 longitude/latitude passthrough.
///
/// Spatial reference handling belongs to the rendering backend; this
/// projector only carries the declared extent and hands coordinates over
/// unmodified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicProjector {
    extent: Extent,
}

impl GeographicProjector {
    #[must_use]
    pub fn new(extent: Extent) -> Self {
        Self { extent }
    }
}

impl Projector for GeographicProjector {
    fn project(&self, point: Coord) -> Coord {
        point
    }

    fn extent(&self) -> Extent {
        self.extent
    }
}

/// Flat-sky linear approximation of a tangent-plane projection.
///
/// ```text
/// px = W/2 + ((ra - ra0) / (fov/2)) * (W/2)
/// py = H/2 - ((dec - dec0) / (fov/2)) * (H/2)
/// ```
///
/// No `cos(dec)` scaling is applied: the field is square in RA/Dec degrees
/// and accuracy degrades away from the centre and toward the poles.
/// Consumers depend on this exact linear behaviour; switching to a true
/// gnomonic projection would be a breaking change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentPlaneProjector {
    center: Coord,
    fov: f64,
}

impl TangentPlaneProjector {
    pub fn new(center: Coord, fov: f64) -> MapResult<Self> {
        if !center.is_finite() {
            return Err(MapError::InvalidData(
                "projection centre must be finite".to_owned(),
            ));
        }
        if !fov.is_finite() || fov <= 0.0 {
            return Err(MapError::InvalidData(
                "field of view must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self { center, fov })
    }

    #[must_use]
    pub fn center(&self) -> Coord {
        self.center
    }

    #[must_use]
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Pixel position of `(ra, dec)` on a `viewport`-sized raster.
    pub fn to_pixel(&self, point: Coord, viewport: Viewport) -> MapResult<(f64, f64)> {
        if !viewport.is_valid() {
            return Err(MapError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !point.is_finite() {
            return Err(MapError::InvalidData(
                "celestial coordinate must be finite".to_owned(),
            ));
        }

        let half_fov = self.fov / 2.0;
        let half_width = f64::from(viewport.width) / 2.0;
        let half_height = f64::from(viewport.height) / 2.0;
        let px = half_width + ((point.axis1 - self.center.axis1) / half_fov) * half_width;
        let py = half_height - ((point.axis2 - self.center.axis2) / half_fov) * half_height;
        Ok((px, py))
    }
}

impl Projector for TangentPlaneProjector {
    fn project(&self, point: Coord) -> Coord {
        point
    }

    fn extent(&self) -> Extent {
        let half = self.fov / 2.0;
        Extent {
            min1: self.center.axis1 - half,
            min2: self.center.axis2 - half,
            max1: self.center.axis1 + half,
            max2: self.center.axis2 + half,
        }
    }
}

/// Linear extent-space to pixel-space mapping used by raster backends.
///
/// Axis 2 grows upward in extent space and downward in pixel space. For a
/// square celestial extent `centre ± fov/2` this reproduces
/// [`TangentPlaneProjector::to_pixel`] exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    extent: Extent,
    viewport: Viewport,
}

impl ViewTransform {
    pub fn new(extent: Extent, viewport: Viewport) -> MapResult<Self> {
        extent.validate()?;
        if !viewport.is_valid() {
            return Err(MapError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self { extent, viewport })
    }

    #[must_use]
    pub fn to_pixel(&self, point: Coord) -> (f64, f64) {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let x = (point.axis1 - self.extent.min1) / self.extent.width() * width;
        let y = height - (point.axis2 - self.extent.min2) / self.extent.height() * height;
        (x, y)
    }

    #[must_use]
    pub fn to_domain(&self, x: f64, y: f64) -> Coord {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        Coord::new(
            self.extent.min1 + x / width * self.extent.width(),
            self.extent.min2 + (height - y) / height * self.extent.height(),
        )
    }
}
