use std::fs;

use approx::assert_abs_diff_eq;
use skymap_rs::PathMapAssembler;
use skymap_rs::core::{LabeledPoint, Viewport};
use skymap_rs::render::{Color, MapPrimitive, RecordingCanvas};
use skymap_rs::style::{EntityClass, PathMapStyle};

fn rome_walk() -> Vec<LabeledPoint> {
    vec![
        LabeledPoint::new(12.4924, 41.8902).with_label("08:00"),
        LabeledPoint::new(12.4823, 41.8955).with_label("08:20"),
        LabeledPoint::new(12.4768, 41.8986),
    ]
}

#[test]
fn automatic_extent_pads_track_and_points() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(400, 300)));
    map.add_gps_path(rome_walk());
    map.add_point_labels([LabeledPoint::new(12.50, 41.90).with_label("Colosseo")]);

    let extent = map.auto_extent(10.0).expect("extent");
    // Ranges are tiny, so the 0.1° floor decides both axes.
    assert_abs_diff_eq!(extent.min1, 12.4768 - 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(extent.max1, 12.50 + 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(extent.min2, 41.8902 - 0.1, epsilon = 1e-9);
    assert_eq!(map.extent(), Some(extent));
}

#[test]
fn auto_extent_without_data_is_an_error() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(64, 64)));
    assert!(map.auto_extent(10.0).is_err());
    assert!(map.extent().is_none());
}

#[test]
fn extent_from_given_points_uses_the_requested_margin() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(64, 64)));
    let points = [LabeledPoint::new(0.0, 0.0), LabeledPoint::new(10.0, 20.0)];
    let extent = map.auto_extent_from_points(&points, 50.0).expect("extent");
    assert_abs_diff_eq!(extent.min1, -5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(extent.max2, 30.0, epsilon = 1e-12);
}

#[test]
fn tracks_draw_under_points_over_base_layers() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(400, 300)));
    map.add_point_labels(rome_walk());
    map.add_gps_path(rome_walk());
    map.add_base_layer("data/italy.geojson", "italy");

    let outcome = map.render_to_buffer();
    assert!(outcome.is_success(), "{:?}", outcome.error());
    let classes: Vec<EntityClass> = map
        .canvas()
        .primitives()
        .iter()
        .map(MapPrimitive::class)
        .collect();
    assert_eq!(
        classes,
        vec![
            EntityClass::BaseLayer,
            EntityClass::GpsTrack,
            EntityClass::GpsPoint
        ]
    );
}

#[test]
fn point_labels_follow_the_style_flag() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
    map.add_point_labels(rome_walk());
    map.set_style(PathMapStyle {
        show_point_labels: false,
        ..PathMapStyle::default()
    });
    let frame = map.build_frame().expect("frame");
    let batch = frame.point_batches().next().expect("points");
    assert_eq!(batch.markers.len(), 3);
    assert_eq!(batch.label_count(), 0);
}

#[test]
fn background_colour_reaches_the_canvas() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
    map.add_gps_path(rome_walk());
    map.set_background_color(Color::rgb8(0xE0, 0xF0, 0xFF));

    let path = dir.path().join("walk.png");
    assert!(map.render_to_file(&path).is_success());
    assert_eq!(map.canvas().background(), Color::rgb8(0xE0, 0xF0, 0xFF));
    assert!(fs::metadata(&path).expect("written").len() > 0);
}

#[test]
fn empty_map_render_reports_missing_data() {
    let mut map = PathMapAssembler::new(RecordingCanvas::new(Viewport::new(100, 100)));
    let outcome = map.render_to_buffer();
    assert!(!outcome.is_success());
    assert!(
        outcome
            .error()
            .is_some_and(|error| error.contains("no extent"))
    );
}
