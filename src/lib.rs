//! skymap-rs: composition core for astronomical and geographic overlays.
//!
//! Star fields, constellation geometry, asteroid trajectories, occultation
//! shadow paths, observation stations and GPS tracks are projected into a
//! shared view, styled, ordered into fixed draw layers and handed to a
//! [`render::Canvas`] for rasterization.

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod render;
pub mod style;
pub mod telemetry;

pub use api::{
    FinderChartAssembler, OccultationMapAssembler, PathMapAssembler, RenderOutcome,
    SkyMapAssembler,
};
pub use error::{MapError, MapResult};
