use serde::{Deserialize, Serialize};

/// Overlay draw layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayLayer {
    Grid,
    BaseMap,
    Boundaries,
    ConnectingLines,
    SecondaryPaths,
    PrimaryPath,
    PointMarkers,
    Highlight,
    FieldOfViewIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayLayerStack {
    pub layers: Vec<OverlayLayer>,
}

impl OverlayLayerStack {
    /// The one order every assembler draws in. Later layers paint over
    /// earlier ones.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: vec![
                OverlayLayer::Grid,
                OverlayLayer::BaseMap,
                OverlayLayer::Boundaries,
                OverlayLayer::ConnectingLines,
                OverlayLayer::SecondaryPaths,
                OverlayLayer::PrimaryPath,
                OverlayLayer::PointMarkers,
                OverlayLayer::Highlight,
                OverlayLayer::FieldOfViewIndicator,
            ],
        }
    }

    #[must_use]
    pub fn position(&self, layer: OverlayLayer) -> Option<usize> {
        self.layers.iter().position(|candidate| *candidate == layer)
    }
}

impl Default for OverlayLayerStack {
    fn default() -> Self {
        Self::canonical()
    }
}
