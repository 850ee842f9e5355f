use skymap_rs::core::StationGroupKind;
use skymap_rs::render::{Color, StrokePattern};
use skymap_rs::style::{
    EntityClass, FinderChartStyle, MAGNITUDE_SIZE_CAP, OccultationStyle, PathMapStyle,
    SkyMapStyle, StyleConfig, magnitude_marker_size,
};

#[test]
fn sky_map_defaults_resolve_to_documented_attributes() {
    let style = SkyMapStyle::default();
    let star = style.resolve(EntityClass::Star);
    assert_eq!(star.marker_color(), Color::BLACK);
    assert_eq!(star.marker_size, 2.0);
    assert_eq!(star.label(Some("SAO 1")).as_deref(), Some("SAO 1"));

    let target = style.resolve(EntityClass::Target);
    assert_eq!(target.font_size, style.label_font_size + 2.0);
    assert_eq!(target.marker_color(), Color::rgb8(0xFF, 0, 0));

    let fov = style.resolve(EntityClass::FovIndicator);
    assert_eq!(fov.pattern, StrokePattern::FOV_DASH);
    assert!(!style.resolve(EntityClass::CentralLine).visible);
}

#[test]
fn labels_need_both_the_flag_and_text() {
    let style = SkyMapStyle {
        show_star_labels: false,
        ..SkyMapStyle::default()
    };
    assert_eq!(style.resolve(EntityClass::Star).label(Some("SAO 1")), None);

    let style = SkyMapStyle::default();
    let star = style.resolve(EntityClass::Star);
    assert_eq!(star.label(Some("")), None);
    assert_eq!(star.label(None), None);
}

#[test]
fn finder_chart_palette_differs_and_hides_the_fov_rectangle() {
    let style = FinderChartStyle::default();
    assert_eq!(
        style.resolve(EntityClass::ConstellationLine).stroke_color,
        Color::rgb8(0, 0, 0xFF)
    );
    assert_eq!(
        style.resolve(EntityClass::Trajectory).stroke_color,
        Color::rgb8(0xFF, 0x88, 0x00)
    );
    assert!(style.resolve(EntityClass::ConstellationName).visible);
    assert!(!style.resolve(EntityClass::FovIndicator).visible);
}

#[test]
fn occultation_station_groups_use_status_colors() {
    let style = OccultationStyle::default();
    let color = |kind| style.resolve(EntityClass::Station(kind)).marker_color();
    assert_eq!(color(StationGroupKind::Positive), Color::rgb8(0, 0xFF, 0));
    assert_eq!(color(StationGroupKind::Negative), Color::rgb8(0xFF, 0, 0));
    assert_eq!(color(StationGroupKind::Other), Color::rgb8(0xCC, 0xCC, 0xCC));
    assert_eq!(style.grid_step(), Some(5.0));
    assert_eq!(style.legend().len(), 6);
}

#[test]
fn partial_style_documents_keep_defaults() {
    let style: OccultationStyle = serde_json::from_str(
        r##"{"central_line_color": "#00FF00", "show_station_labels": false}"##,
    )
    .expect("occultation style");
    assert_eq!(style.central_line_color, Color::rgb8(0, 0xFF, 0));
    assert!(!style.show_station_labels);
    assert_eq!(style.sigma_line_width, 2.0);

    let style: SkyMapStyle =
        serde_json::from_str(r#"{"star_color": "orange", "grid_step_degrees": 2.5}"#)
            .expect("sky style");
    assert_eq!(style.star_color, Color::rgb8(0xFF, 0xA5, 0x00));
    assert_eq!(style.grid_step(), Some(2.5));
    assert!(style.show_grid);

    let style: PathMapStyle = serde_json::from_str("{}").expect("path style");
    assert_eq!(style, PathMapStyle::default());
}

#[test]
fn bad_colour_strings_fail_the_style_document() {
    let result: Result<SkyMapStyle, _> = serde_json::from_str(r##"{"star_color": "#12"}"##);
    assert!(result.is_err());
}

#[test]
fn magnitude_sizing_grows_for_bright_stars_and_is_capped() {
    let base = 2.0;
    assert_eq!(magnitude_marker_size(base, 13.0, 13.0), base);
    assert!(magnitude_marker_size(base, 8.0, 13.0) > base);
    assert!(magnitude_marker_size(base, 4.0, 13.0) > magnitude_marker_size(base, 8.0, 13.0));
    assert_eq!(
        magnitude_marker_size(base, -30.0, 13.0),
        base * MAGNITUDE_SIZE_CAP
    );
}
