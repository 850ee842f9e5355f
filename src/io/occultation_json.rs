//! Occultation event documents.
//!
//! ```json
//! { "id": "...", "name": "...", "catalog_id": "...", "gregorian": "...",
//!   "magnitude_drop": 0.0, "duration_seconds": 0.0,
//!   "central_line": [{"lon": 0, "lat": 0, "time": "..."}],
//!   "northern_limit_1sigma": [...], "southern_limit_1sigma": [...],
//!   "time_markers": [{"lon": 0, "lat": 0, "time": "...", "seconds_from_mid": 0}],
//!   "observation_stations": [{"name": "...", "lon": 0, "lat": 0, "status": "..."}] }
//! ```
//!
//! Each path section is decoded from its own array. A record without a
//! usable `lon`/`lat` is skipped; other missing fields fall back to empty or
//! zero.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::occultation::parse_utc_timestamp;
use crate::core::{ObservationStation, OccultationEvent, PathPoint, TimeMarker};
use crate::error::MapResult;

use super::{FieldReader, LoadReport, object_records, parse_object, read_object};

pub fn read_occultation_event(path: &Path) -> MapResult<(OccultationEvent, LoadReport)> {
    let object = read_object(path)?;
    let decoded = decode_root(&object);
    debug!(
        path = %path.display(),
        central = decoded.0.central_line.len(),
        stations = decoded.0.stations.len(),
        issues = decoded.1.issue_count(),
        "occultation document read"
    );
    Ok(decoded)
}

pub fn decode_occultation_event(text: &str) -> MapResult<(OccultationEvent, LoadReport)> {
    Ok(decode_root(&parse_object(text)?))
}

fn decode_root(object: &Map<String, Value>) -> (OccultationEvent, LoadReport) {
    let mut report = LoadReport::default();
    let root = FieldReader::root(object);

    let time_utc = root.text_or_empty("gregorian", &mut report);
    if !time_utc.is_empty() && parse_utc_timestamp(&time_utc).is_none() {
        report.invalid_fields.push("gregorian".to_owned());
    }

    let event = OccultationEvent {
        event_id: root.text_or_empty("id", &mut report),
        body_name: root.text_or_empty("name", &mut report),
        star_id: root.text_or_empty("catalog_id", &mut report),
        time_utc,
        magnitude_drop: root.number_or("magnitude_drop", 0.0, &mut report),
        duration_seconds: root.number_or("duration_seconds", 0.0, &mut report),
        central_line: path_section(&root, "central_line", &mut report),
        northern_limit: path_section(&root, "northern_limit_1sigma", &mut report),
        southern_limit: path_section(&root, "southern_limit_1sigma", &mut report),
        time_markers: time_markers(&root, &mut report),
        stations: stations(&root, &mut report),
    };
    (event, report)
}

fn position(record: &FieldReader<'_, '_>, report: &mut LoadReport) -> Option<(f64, f64)> {
    let lon = record.number("lon", report);
    let lat = record.number("lat", report);
    lon.zip(lat)
}

fn path_section(root: &FieldReader<'_, '_>, key: &str, report: &mut LoadReport) -> Vec<PathPoint> {
    let items = root.array(key, report);
    let mut points = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let Some((lon, lat)) = position(&record, report) else {
            report.skipped_records.push(path);
            continue;
        };
        points.push(PathPoint::new(lon, lat, record.text_or_empty("time", report)));
    }
    points
}

fn time_markers(root: &FieldReader<'_, '_>, report: &mut LoadReport) -> Vec<TimeMarker> {
    let key = "time_markers";
    let items = root.array(key, report);
    let mut markers = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let Some((lon, lat)) = position(&record, report) else {
            report.skipped_records.push(path);
            continue;
        };
        let time = record.text_or_empty("time", report);
        let offset = record.number_or("seconds_from_mid", 0.0, report).round() as i64;
        markers.push(TimeMarker::new(lon, lat, time, offset));
    }
    markers
}

fn stations(root: &FieldReader<'_, '_>, report: &mut LoadReport) -> Vec<ObservationStation> {
    let key = "observation_stations";
    let items = root.array(key, report);
    let mut stations = Vec::with_capacity(items.len());
    for (path, object) in object_records(key, items, report) {
        let record = FieldReader::record(object, &path);
        let Some((lon, lat)) = position(&record, report) else {
            report.skipped_records.push(path);
            continue;
        };
        let name = record.text_or_empty("name", report);
        let status = record.text_or_empty("status", report);
        stations.push(ObservationStation::new(name, lon, lat, &status));
    }
    stations
}
