use proptest::prelude::*;
use skymap_rs::api::LayerCompositor;
use skymap_rs::core::{
    ConstellationBoundary, ConstellationLine, Coord, Extent, GeographicProjector, LabeledPoint,
    ObservationStation, PathPoint, StationGroupKind, StationGroups, Star, TangentPlaneProjector,
    Target, TimeMarker, Viewport,
};
use skymap_rs::render::{OverlayLayer, OverlayLayerStack};
use skymap_rs::style::{EntityClass, OccultationStyle, PathMapStyle, SkyMapStyle};

fn sky_classes(reverse_calls: bool) -> Vec<EntityClass> {
    let projector = TangentPlaneProjector::new(Coord::new(45.0, 12.0), 10.0).expect("projector");
    let style = SkyMapStyle::default();
    let boundaries = vec![ConstellationBoundary::new(
        vec![Coord::new(41.0, 8.0), Coord::new(49.0, 8.0), Coord::new(49.0, 16.0)],
        "Ari",
    )];
    let lines = vec![ConstellationLine::new(
        Coord::new(43.0, 10.0),
        Coord::new(47.0, 14.0),
        "Ari",
    )];
    let stars = vec![Star::new(93_299, 45.0, 12.0, 8.0)];
    let target = Target::new("(17030) Ponce", 45.2, 12.1, 15.0).with_trajectory(
        vec![Coord::new(44.5, 11.8), Coord::new(45.2, 12.1)],
        vec!["2025-11-26".to_owned(), "2025-11-27".to_owned()],
    );
    let bounds = Extent::centered(Coord::new(45.0, 12.0), 4.0).expect("bounds");

    let mut compositor = LayerCompositor::new(Viewport::new(800, 800), &projector, &style);
    if reverse_calls {
        compositor
            .field_of_view(bounds)
            .target(&target)
            .trajectory(&target)
            .stars(&stars, 13.0)
            .constellation_lines(&lines)
            .constellation_boundaries(&boundaries)
            .grid();
    } else {
        compositor
            .grid()
            .constellation_boundaries(&boundaries)
            .constellation_lines(&lines)
            .trajectory(&target)
            .stars(&stars, 13.0)
            .target(&target)
            .field_of_view(bounds);
    }
    compositor.finish().class_sequence()
}

#[test]
fn sky_primitives_follow_back_to_front_layers_across_call_orders() {
    let forward = sky_classes(false);
    let reversed = sky_classes(true);
    assert_eq!(forward, reversed);

    let non_grid: Vec<EntityClass> = forward
        .into_iter()
        .filter(|class| *class != EntityClass::Grid)
        .collect();
    assert_eq!(
        non_grid,
        vec![
            EntityClass::ConstellationBoundary,
            EntityClass::ConstellationLine,
            EntityClass::Trajectory,
            EntityClass::TrajectoryTick,
            EntityClass::Star,
            EntityClass::Target,
            EntityClass::FovIndicator,
        ]
    );
}

#[test]
fn identical_input_composes_identical_frames() {
    assert_eq!(sky_classes(false), sky_classes(false));
}

#[test]
fn occultation_layers_put_limits_under_the_central_line_under_markers() {
    let extent = Extent::new(5.0, 35.0, 20.0, 48.0).expect("extent");
    let projector = GeographicProjector::new(extent);
    let style = OccultationStyle {
        show_grid: false,
        ..OccultationStyle::default()
    };
    let north = vec![PathPoint::new(6.0, 41.0, ""), PathPoint::new(19.0, 44.0, "")];
    let south = vec![PathPoint::new(6.0, 39.0, ""), PathPoint::new(19.0, 42.0, "")];
    let central = vec![PathPoint::new(6.0, 40.0, ""), PathPoint::new(19.0, 43.0, "")];
    let markers = vec![TimeMarker::new(12.0, 41.5, "18:45:00", 0)];
    let stations = vec![
        ObservationStation::new("Torino", 7.7, 45.1, "clouded"),
        ObservationStation::new("Roma", 12.5, 41.9, "negative"),
        ObservationStation::new("Napoli", 14.2, 40.8, "positive"),
    ];
    let groups = StationGroups::partition(&stations);

    let mut compositor = LayerCompositor::new(Viewport::new(640, 480), &projector, &style);
    compositor
        .stations(&groups)
        .time_markers(&markers)
        .central_line(&central)
        .sigma_limits(&north, &south);
    let classes = compositor.finish().class_sequence();
    assert_eq!(
        classes,
        vec![
            EntityClass::SigmaLimit,
            EntityClass::SigmaLimit,
            EntityClass::CentralLine,
            EntityClass::Station(StationGroupKind::Positive),
            EntityClass::Station(StationGroupKind::Negative),
            EntityClass::Station(StationGroupKind::Other),
            EntityClass::TimeMarker,
        ]
    );
}

#[test]
fn gps_points_without_labels_keep_their_markers() {
    let extent = Extent::new(0.0, 0.0, 10.0, 10.0).expect("extent");
    let projector = GeographicProjector::new(extent);
    let style = PathMapStyle::default();
    let points = vec![
        LabeledPoint::new(1.0, 1.0).with_label("start"),
        LabeledPoint::new(2.0, 2.0),
    ];
    let mut compositor = LayerCompositor::new(Viewport::new(100, 100), &projector, &style);
    compositor.gps_points(&points);
    let frame = compositor.finish();
    let batch = frame.point_batches().next().expect("points");
    assert_eq!(batch.markers.len(), 2);
    assert_eq!(batch.label_count(), 1);
}

#[test]
fn canonical_stack_lists_the_nine_layers_in_paint_order() {
    let stack = OverlayLayerStack::canonical();
    assert_eq!(stack.position(OverlayLayer::Grid), Some(0));
    assert_eq!(stack.position(OverlayLayer::BaseMap), Some(1));
    assert_eq!(stack.position(OverlayLayer::PointMarkers), Some(6));
    assert_eq!(stack.position(OverlayLayer::FieldOfViewIndicator), Some(8));
}

fn status() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("positive".to_owned()),
        Just("negative".to_owned()),
        Just("clouded".to_owned()),
        "[a-zA-Z]{0,10}",
    ]
}

proptest! {
    #[test]
    fn every_station_lands_in_exactly_one_group(statuses in prop::collection::vec(status(), 0..40)) {
        let stations: Vec<ObservationStation> = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| ObservationStation::new(format!("S{index}"), 0.0, 0.0, status))
            .collect();
        let groups = StationGroups::partition(&stations);
        prop_assert_eq!(groups.len(), stations.len());

        let mut names: Vec<&str> = groups
            .in_draw_order()
            .iter()
            .flat_map(|(_, members)| members.iter().map(|station| station.name.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), stations.len());

        for station in &groups.positive {
            prop_assert_eq!(station.status.tag(), "positive");
        }
        for station in &groups.negative {
            prop_assert_eq!(station.status.tag(), "negative");
        }
        for station in &groups.other {
            prop_assert!(station.status.tag() != "positive" && station.status.tag() != "negative");
        }
    }
}
