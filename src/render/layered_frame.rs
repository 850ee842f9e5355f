use crate::core::{Extent, Viewport};

use super::{
    BaseLayer, Color, MapFrame, MapPrimitive, OverlayLayer, OverlayLayerStack, PathPrimitive,
    PointBatch,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub layer: OverlayLayer,
    pub primitives: Vec<MapPrimitive>,
}

/// Frame under construction, bucketed by overlay layer.
///
/// Emission order inside one layer is kept; `flatten` concatenates layers in
/// stack order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredMapFrame {
    pub viewport: Viewport,
    pub extent: Extent,
    pub background: Color,
    pub layers: Vec<LayerPrimitives>,
}

impl LayeredMapFrame {
    #[must_use]
    pub fn from_stack(
        viewport: Viewport,
        extent: Extent,
        background: Color,
        stack: OverlayLayerStack,
    ) -> Self {
        let layers = stack
            .layers
            .into_iter()
            .map(|layer| LayerPrimitives {
                layer,
                primitives: Vec::new(),
            })
            .collect();
        Self {
            viewport,
            extent,
            background,
            layers,
        }
    }

    #[must_use]
    pub fn canonical(viewport: Viewport, extent: Extent, background: Color) -> Self {
        Self::from_stack(viewport, extent, background, OverlayLayerStack::canonical())
    }

    pub fn push_path(&mut self, layer: OverlayLayer, path: PathPrimitive) {
        if let Some(bucket) = self.layer_mut(layer) {
            bucket.primitives.push(MapPrimitive::Path(path));
        }
    }

    /// Empty batches are dropped.
    pub fn push_points(&mut self, layer: OverlayLayer, batch: PointBatch) {
        if batch.markers.is_empty() {
            return;
        }
        if let Some(bucket) = self.layer_mut(layer) {
            bucket.primitives.push(MapPrimitive::Points(batch));
        }
    }

    pub fn push_base_layer(&mut self, layer: OverlayLayer, base: BaseLayer) {
        if let Some(bucket) = self.layer_mut(layer) {
            bucket.primitives.push(MapPrimitive::BaseLayer(base));
        }
    }

    #[must_use]
    pub fn layer(&self, layer: OverlayLayer) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|bucket| bucket.layer == layer)
    }

    #[must_use]
    pub fn flatten(&self) -> MapFrame {
        let mut frame = MapFrame::new(self.viewport, self.extent, self.background);
        for bucket in &self.layers {
            frame.primitives.extend(bucket.primitives.iter().cloned());
        }
        frame
    }

    #[must_use]
    pub fn flatten_layers(&self, include_layers: &[OverlayLayer]) -> MapFrame {
        let mut frame = MapFrame::new(self.viewport, self.extent, self.background);
        for bucket in &self.layers {
            if !include_layers.contains(&bucket.layer) {
                continue;
            }
            frame.primitives.extend(bucket.primitives.iter().cloned());
        }
        frame
    }

    fn layer_mut(&mut self, layer: OverlayLayer) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|bucket| bucket.layer == layer)
    }
}

#[cfg(test)]
mod tests {
    use super::LayeredMapFrame;
    use crate::core::{Coord, Extent, Viewport};
    use crate::render::{Color, OverlayLayer, PathPrimitive, PointBatch, PointMarker};
    use crate::style::EntityClass;

    fn frame() -> LayeredMapFrame {
        LayeredMapFrame::canonical(
            Viewport::new(100, 50),
            Extent::new(0.0, 0.0, 10.0, 10.0).expect("extent"),
            Color::WHITE,
        )
    }

    #[test]
    fn flatten_follows_layer_order_not_push_order() {
        let mut layered = frame();
        layered.push_points(
            OverlayLayer::PointMarkers,
            PointBatch::new(EntityClass::Star, Color::BLACK, Color::BLACK, 8.0)
                .with_markers(vec![PointMarker::new(Coord::new(1.0, 1.0), 2.0, None)]),
        );
        layered.push_path(
            OverlayLayer::Boundaries,
            PathPrimitive::new(
                EntityClass::ConstellationBoundary,
                [Coord::new(0.0, 0.0), Coord::new(5.0, 5.0)],
                Color::BLACK,
                1.0,
            ),
        );
        layered.push_path(
            OverlayLayer::Grid,
            PathPrimitive::new(
                EntityClass::Grid,
                [Coord::new(2.0, 0.0), Coord::new(2.0, 10.0)],
                Color::BLACK,
                0.5,
            ),
        );

        let flattened = layered.flatten();
        assert_eq!(
            flattened.class_sequence(),
            vec![
                EntityClass::Grid,
                EntityClass::ConstellationBoundary,
                EntityClass::Star
            ]
        );
        let markers_only = layered.flatten_layers(&[OverlayLayer::PointMarkers]);
        assert_eq!(markers_only.point_batch_count(), 1);
        assert_eq!(markers_only.path_count(), 0);
    }

    #[test]
    fn empty_point_batches_are_not_emitted() {
        let mut layered = frame();
        layered.push_points(
            OverlayLayer::PointMarkers,
            PointBatch::new(EntityClass::Star, Color::BLACK, Color::BLACK, 8.0),
        );
        assert!(layered.flatten().is_empty());
    }
}
