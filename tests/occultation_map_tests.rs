use std::fs;

use skymap_rs::OccultationMapAssembler;
use skymap_rs::core::{OccultationEvent, StationGroupKind, Viewport};
use skymap_rs::render::{MapPrimitive, RecordingCanvas};
use skymap_rs::style::EntityClass;

const ONE_POINT_TWO_STATIONS: &str = r#"{
    "id": "20251128_17030",
    "name": "(17030) Ponce",
    "catalog_id": "TYC 1339-00412-1",
    "gregorian": "2025-11-28T18:45:00Z",
    "magnitude_drop": 2.4,
    "duration_seconds": 3.1,
    "central_line": [{"lon": 12.5, "lat": 41.9, "time": "18:45:00"}],
    "northern_limit_1sigma": [],
    "southern_limit_1sigma": [],
    "time_markers": [],
    "observation_stations": [
        {"name": "Roma", "lon": 12.5, "lat": 41.9, "status": "positive"},
        {"name": "Firenze", "lon": 11.2, "lat": 43.7, "status": "negative"}
    ]
}"#;

fn assembler() -> OccultationMapAssembler<RecordingCanvas> {
    OccultationMapAssembler::new(RecordingCanvas::new(Viewport::new(800, 600)))
}

fn write_document(dir: &tempfile::TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("event.json");
    fs::write(&path, text).expect("write document");
    path
}

#[test]
fn single_central_point_with_two_stations_renders_two_station_batches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_document(&dir, ONE_POINT_TWO_STATIONS);

    let mut map = assembler();
    assert!(map.load_from_json(&path));
    assert_eq!(map.event().central_line.len(), 1);

    let outcome = map.render_to_buffer(false);
    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert!(outcome.raster().is_some());
    assert!(map.last_rendered_buffer().is_some());
    assert!(!map.last_rendered_image_base64().is_empty());

    let station_batches: Vec<EntityClass> = map
        .canvas()
        .primitives()
        .iter()
        .filter_map(|primitive| match primitive {
            MapPrimitive::Points(batch) if matches!(batch.class, EntityClass::Station(_)) => {
                Some(batch.class)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        station_batches,
        vec![
            EntityClass::Station(StationGroupKind::Positive),
            EntityClass::Station(StationGroupKind::Negative),
        ]
    );
}

#[test]
fn loading_a_missing_file_keeps_the_previous_event() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_document(&dir, ONE_POINT_TWO_STATIONS);

    let mut map = assembler();
    assert!(map.load_from_json(&path));
    let before = map.event().clone();

    assert!(!map.load_from_json(dir.path().join("does-not-exist.json")));
    assert_eq!(map.event(), &before);
}

#[test]
fn malformed_document_is_rejected_without_touching_the_model() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = write_document(&dir, ONE_POINT_TWO_STATIONS);
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "[1, 2, 3]").expect("write");

    let mut map = assembler();
    assert!(map.load_from_json(&good));
    assert!(map.load_from_json_with_report(&bad).is_err());
    assert_eq!(map.event().event_id, "20251128_17030");
}

#[test]
fn report_lists_missing_fields_and_skipped_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_document(
        &dir,
        r#"{
            "id": "partial",
            "central_line": [{"lon": 10.0, "lat": 40.0}, {"lat": 41.0}],
            "observation_stations": [{"name": "Roma", "lon": 12.5, "lat": 41.9}]
        }"#,
    );

    let mut map = assembler();
    let report = map.load_from_json_with_report(&path).expect("load");
    assert!(report.is_missing("gregorian"));
    assert!(report.is_missing("northern_limit_1sigma"));
    assert!(report.is_missing("central_line[0].time"));
    assert!(report.is_missing("observation_stations[0].status"));
    assert!(
        report
            .skipped_records
            .contains(&"central_line[1]".to_owned())
    );

    let event = map.event();
    assert_eq!(event.central_line.len(), 1);
    assert_eq!(event.magnitude_drop, 0.0);
    assert!(event.time_utc.is_empty());
    assert_eq!(event.station_groups().other.len(), 1);
}

#[test]
fn render_without_central_line_fails_and_clears_the_raster() {
    let mut map = assembler();
    map.set_occultation_data(OccultationEvent::default());
    let outcome = map.render_to_buffer(true);
    assert!(!outcome.is_success());
    assert!(outcome.raster().is_none());
    assert!(map.last_error().is_some());
    assert!(map.last_rendered_image_base64().is_empty());
}

#[test]
fn backend_failure_surfaces_as_a_failed_outcome() {
    let mut canvas = RecordingCanvas::new(Viewport::new(320, 240));
    canvas.set_fail_on_rasterize(true);
    let mut map = OccultationMapAssembler::new(canvas);
    let (event, _) =
        skymap_rs::io::decode_occultation_event(ONE_POINT_TWO_STATIONS).expect("decode");
    map.set_occultation_data(event);

    let outcome = map.render_to_buffer(false);
    assert!(!outcome.is_success());
    assert!(outcome.error().is_some());
}

#[test]
fn html_export_embeds_event_rows_and_the_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json = write_document(&dir, ONE_POINT_TWO_STATIONS);
    let html_path = dir.path().join("event.html");

    let mut map = assembler();
    assert!(map.load_from_json(&json));
    map.set_base_layers(Vec::new());
    let outcome = map.export_html(&html_path, "Occultation 17030");
    assert!(outcome.is_success(), "{:?}", outcome.error());

    let html = fs::read_to_string(&html_path).expect("html");
    assert!(html.contains("<title>Occultation 17030</title>"));
    assert!(html.contains("20251128_17030"));
    assert!(html.contains("(17030) Ponce"));
    assert!(html.contains("TYC 1339-00412-1"));
    assert!(html.contains("2025-11-28 18:45:00 UTC"));
    assert!(html.contains("3.1 s"));
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("Positive station"));
}

#[test]
fn failed_html_write_leaves_no_rendered_buffer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json = write_document(&dir, ONE_POINT_TWO_STATIONS);
    let html_path = dir.path().join("missing").join("event.html");

    let mut map = assembler();
    assert!(map.load_from_json(&json));
    assert!(map.render_to_buffer(false).is_success());
    assert!(map.last_rendered_buffer().is_some());

    let outcome = map.export_html(&html_path, "Occultation 17030");
    assert!(!outcome.is_success());
    assert!(map.last_error().is_some());
    assert!(map.last_rendered_buffer().is_none());
    assert!(map.last_rendered_image_base64().is_empty());
}
