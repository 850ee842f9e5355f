//! Finder chart documents.
//!
//! Keys: `center_ra_deg`, `center_dec_deg`, `fov_deg`, `magnitude_limit`,
//! `name`, optional `target_ra_deg`/`target_dec_deg`/`target_magnitude`,
//! and the arrays `sao_stars`, `constellation_lines`,
//! `asteroid_trajectory` and `constellation_boundaries`. Boundaries are
//! either `{constellation, points: [{ra_deg, dec_deg}]}` polygons or one
//! flat list of `{ra_deg, dec_deg}` vertices.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::{
    CelestialScene, ConstellationBoundary, ConstellationLine, Coord, FieldOfView, Star,
    StarFilter, Target,
};
use crate::error::MapResult;

use super::{FieldReader, LoadReport, object_records, parse_object, read_object};

pub fn read_finder_chart(path: &Path) -> MapResult<(CelestialScene, LoadReport)> {
    let object = read_object(path)?;
    let (scene, report) = decode_root(&object);
    debug!(
        path = %path.display(),
        stars = scene.stars.len(),
        boundaries = scene.constellation_boundaries.len(),
        issues = report.issue_count(),
        "finder chart document read"
    );
    Ok((scene, report))
}

pub fn decode_finder_chart(text: &str) -> MapResult<(CelestialScene, LoadReport)> {
    Ok(decode_root(&parse_object(text)?))
}

fn decode_root(object: &Map<String, Value>) -> (CelestialScene, LoadReport) {
    let mut report = LoadReport::default();
    let root = FieldReader::root(object);

    let center = Coord::new(
        root.number_or("center_ra_deg", 0.0, &mut report),
        root.number_or("center_dec_deg", 0.0, &mut report),
    );
    let field = FieldOfView::new(
        center,
        root.number_or("fov_deg", FieldOfView::DEFAULT_SPAN_DEG, &mut report),
    );
    let filter = StarFilter::new(root.number_or(
        "magnitude_limit",
        StarFilter::DEFAULT_MAGNITUDE_LIMIT,
        &mut report,
    ));

    let name = root.text_or_empty("name", &mut report);
    let target_ra = root.optional_number("target_ra_deg", &mut report);
    let target_dec = root.optional_number("target_dec_deg", &mut report);
    let target_magnitude = root
        .optional_number("target_magnitude", &mut report)
        .unwrap_or(0.0);
    let (trajectory, timestamps) = trajectory(&root, &mut report);
    let position = match (target_ra, target_dec) {
        (Some(ra), Some(dec)) => Coord::new(ra, dec),
        _ => trajectory.first().copied().unwrap_or(center),
    };
    let target = Target::new(name, position.axis1, position.axis2, target_magnitude)
        .with_trajectory(trajectory, timestamps);

    let scene = CelestialScene {
        field,
        filter,
        stars: stars(&root, &mut report),
        constellation_lines: constellation_lines(&root, &mut report),
        constellation_boundaries: constellation_boundaries(&root, &mut report),
        target,
    };
    (scene, report)
}

fn sky_position(record: &FieldReader<'_, '_>, report: &mut LoadReport) -> Option<Coord> {
    let ra = record.number("ra_deg", report);
    let dec = record.number("dec_deg", report);
    ra.zip(dec).map(Coord::from)
}

fn stars(root: &FieldReader<'_, '_>, report: &mut LoadReport) -> Vec<Star> {
    let key = "sao_stars";
    let items = root.array(key, report);
    let mut stars = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let position = sky_position(&record, report);
        let magnitude = record.number("magnitude", report);
        let (Some(position), Some(magnitude)) = (position, magnitude) else {
            report.skipped_records.push(path);
            continue;
        };
        let catalog_number = record
            .number("sao_number", report)
            .filter(|number| *number >= 0.0 && *number <= f64::from(u32::MAX))
            .map_or(0, |number| number as u32);
        let mut star = Star::new(catalog_number, position.axis1, position.axis2, magnitude);
        if let Some(spectral_class) = record.optional_text("spectral_class", report) {
            star = star.with_spectral_class(spectral_class);
        }
        stars.push(star);
    }
    stars
}

fn constellation_lines(root: &FieldReader<'_, '_>, report: &mut LoadReport) -> Vec<ConstellationLine> {
    let key = "constellation_lines";
    let items = root.array(key, report);
    let mut lines = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let coords = [
            record.number("ra1_deg", report),
            record.number("dec1_deg", report),
            record.number("ra2_deg", report),
            record.number("dec2_deg", report),
        ];
        let [Some(ra1), Some(dec1), Some(ra2), Some(dec2)] = coords else {
            report.skipped_records.push(path);
            continue;
        };
        let constellation = record
            .optional_text("constellation", report)
            .unwrap_or_default();
        lines.push(ConstellationLine::new(
            Coord::new(ra1, dec1),
            Coord::new(ra2, dec2),
            constellation,
        ));
    }
    lines
}

fn trajectory(root: &FieldReader<'_, '_>, report: &mut LoadReport) -> (Vec<Coord>, Vec<String>) {
    let key = "asteroid_trajectory";
    let items = root.array(key, report);
    let mut points = Vec::with_capacity(items.len());
    let mut timestamps = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let Some(position) = sky_position(&record, report) else {
            report.skipped_records.push(path);
            continue;
        };
        points.push(position);
        timestamps.push(record.text_or_empty("timestamp", report));
    }
    (points, timestamps)
}

fn constellation_boundaries(
    root: &FieldReader<'_, '_>,
    report: &mut LoadReport,
) -> Vec<ConstellationBoundary> {
    let key = "constellation_boundaries";
    let items = root.array(key, report);
    let records = object_records(key, items, report);
    let is_polygon_list = records
        .first()
        .is_some_and(|(_, object)| object.contains_key("points"));

    if !is_polygon_list {
        let vertices = boundary_vertices(&records, report);
        if vertices.is_empty() {
            return Vec::new();
        }
        return vec![ConstellationBoundary::new(vertices, "")];
    }

    let mut boundaries = Vec::with_capacity(records.len());
    for (path, object) in &records {
        let record = FieldReader::record(object, path);
        let constellation = record.text_or_empty("constellation", report);
        let points_key = format!("{path}.points");
        let point_items = record.array("points", report);
        let point_records = object_records(&points_key, point_items, report);
        let vertices = boundary_vertices(&point_records, report);
        if vertices.len() < 2 {
            report.skipped_records.push(path.clone());
            continue;
        }
        boundaries.push(ConstellationBoundary::new(vertices, constellation));
    }
    boundaries
}

fn boundary_vertices(
    records: &[(String, &Map<String, Value>)],
    report: &mut LoadReport,
) -> Vec<Coord> {
    records
        .iter()
        .filter_map(|(path, object)| {
            let record = FieldReader::record(object, path);
            let vertex = sky_position(&record, report);
            if vertex.is_none() {
                report.skipped_records.push(path.clone());
            }
            vertex
        })
        .collect()
}
