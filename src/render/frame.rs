use serde::{Deserialize, Serialize};

use crate::core::{Extent, Viewport};
use crate::error::{MapError, MapResult};
use crate::render::{Color, MapPrimitive, PointBatch};
use crate::style::EntityClass;

/// Backend-agnostic scene for one overlay draw pass.
///
/// `primitives` is already in final paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    pub viewport: Viewport,
    pub extent: Extent,
    pub background: Color,
    pub primitives: Vec<MapPrimitive>,
}

impl MapFrame {
    #[must_use]
    pub fn new(viewport: Viewport, extent: Extent, background: Color) -> Self {
        Self {
            viewport,
            extent,
            background,
            primitives: Vec::new(),
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        if !self.viewport.is_valid() {
            return Err(MapError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.extent.validate()?;
        self.background.validate()?;
        for primitive in &self.primitives {
            primitive.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    #[must_use]
    pub fn path_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|primitive| matches!(primitive, MapPrimitive::Path(_)))
            .count()
    }

    #[must_use]
    pub fn point_batch_count(&self) -> usize {
        self.point_batches().count()
    }

    pub fn point_batches(&self) -> impl Iterator<Item = &PointBatch> + '_ {
        self.primitives.iter().filter_map(|primitive| match primitive {
            MapPrimitive::Points(batch) => Some(batch),
            _ => None,
        })
    }

    /// Entity classes of drawn primitives in paint order.
    #[must_use]
    pub fn class_sequence(&self) -> Vec<EntityClass> {
        self.primitives
            .iter()
            .map(MapPrimitive::class)
            .collect()
    }
}
