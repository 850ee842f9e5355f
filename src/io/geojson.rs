//! Outline reader for GeoJSON base layers.
//!
//! Only geometry is read: every LineString and polygon ring becomes one
//! polyline in lon/lat. Properties are ignored.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::core::Coord;
use crate::error::{MapError, MapResult};

/// Whether `path` names a source this crate can decode itself.
#[must_use]
pub fn is_geojson_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("geojson") || ext.eq_ignore_ascii_case("json"))
}

pub fn read_outlines(path: &Path) -> MapResult<Vec<Vec<Coord>>> {
    let text = std::fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
    let document: Value = serde_json::from_str(&text)
        .map_err(|err| MapError::Decode(format!("{}: {err}", path.display())))?;
    let mut outlines = Vec::new();
    collect_outlines(&document, &mut outlines);
    debug!(path = %path.display(), outlines = outlines.len(), "read geojson outlines");
    Ok(outlines)
}

fn collect_outlines(value: &Value, outlines: &mut Vec<Vec<Coord>>) {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return;
    };
    match kind {
        "FeatureCollection" => {
            for feature in value.get("features").and_then(Value::as_array).into_iter().flatten() {
                collect_outlines(feature, outlines);
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry") {
                collect_outlines(geometry, outlines);
            }
        }
        "GeometryCollection" => {
            for geometry in value.get("geometries").and_then(Value::as_array).into_iter().flatten() {
                collect_outlines(geometry, outlines);
            }
        }
        "LineString" => push_ring(value.get("coordinates"), outlines),
        "MultiLineString" | "Polygon" => {
            for ring in coordinate_list(value.get("coordinates")) {
                push_ring(Some(ring), outlines);
            }
        }
        "MultiPolygon" => {
            for polygon in coordinate_list(value.get("coordinates")) {
                for ring in coordinate_list(Some(polygon)) {
                    push_ring(Some(ring), outlines);
                }
            }
        }
        _ => {}
    }
}

fn coordinate_list(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

fn push_ring(value: Option<&Value>, outlines: &mut Vec<Vec<Coord>>) {
    let ring: Vec<Coord> = coordinate_list(value)
        .filter_map(|position| {
            let position = position.as_array()?;
            let lon = position.first()?.as_f64()?;
            let lat = position.get(1)?.as_f64()?;
            Some(Coord::new(lon, lat))
        })
        .collect();
    if ring.len() >= 2 {
        outlines.push(ring);
    }
}
