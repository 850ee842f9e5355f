//! Overlay assemblers and the composition pipeline behind them.

mod compositor;
mod export;
mod finder_chart;
mod occultation_map;
mod path_map;
mod render_outcome;
mod render_session;
mod sky_map;

pub use compositor::LayerCompositor;
pub use export::HtmlReport;
pub use finder_chart::FinderChartAssembler;
pub use occultation_map::{OccultationMapAssembler, natural_earth_base_layers};
pub use path_map::PathMapAssembler;
pub use render_outcome::RenderOutcome;
pub use sky_map::SkyMapAssembler;
