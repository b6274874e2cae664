use std::f64::consts::{FRAC_PI_2, PI};

use chrono::NaiveDate;
use progress_charts::chart::{
    DonutGeometry, DonutSegment, build_donut_segments, closed_path, donut_segment_path,
    format_amount, format_coordinate, format_day, format_day_millis, format_percentage,
    format_ratio, polyline_path,
};
use progress_charts::core::ChartPoint;
use progress_charts::core::primitives::day_to_epoch_millis;

fn geometry(inner_radius: f64) -> DonutGeometry {
    DonutGeometry {
        center: ChartPoint::new(100.0, 100.0),
        outer_radius: 50.0,
        inner_radius,
        rotation: 0.0,
    }
}

#[test]
fn polyline_needs_two_points() {
    assert_eq!(polyline_path(&[]), None);
    assert_eq!(polyline_path(&[ChartPoint::new(1.0, 2.0)]), None);

    let path = polyline_path(&[ChartPoint::new(0.0, 0.0), ChartPoint::new(10.0, 5.5)]);
    assert_eq!(path.as_deref(), Some("M 0,0 L 10,5.5"));
}

#[test]
fn closed_path_needs_three_points() {
    let two = [ChartPoint::new(0.0, 0.0), ChartPoint::new(1.0, 1.0)];
    assert_eq!(closed_path(&two), None);

    let triangle = [
        ChartPoint::new(0.0, 0.0),
        ChartPoint::new(10.0, 0.0),
        ChartPoint::new(5.0, 8.126),
    ];
    assert_eq!(
        closed_path(&triangle).as_deref(),
        Some("M 0,0 L 10,0 L 5,8.13 Z")
    );
}

#[test]
fn coordinates_are_trimmed_to_two_decimals() {
    assert_eq!(format_coordinate(3.0), "3");
    assert_eq!(format_coordinate(2.50), "2.5");
    assert_eq!(format_coordinate(-0.001), "0");
    assert_eq!(format_coordinate(120.456), "120.46");
    assert_eq!(format_coordinate(f64::NAN), "0");
}

#[test]
fn full_ring_is_drawn_as_half_arcs() {
    let segments = build_donut_segments(4.0, 0.0);

    let path = donut_segment_path(&segments[0], geometry(30.0));

    assert_eq!(
        path,
        "M 150,100 A 50 50 0 1 1 50,100 A 50 50 0 1 1 150,100 Z \
         M 130,100 A 30 30 0 1 0 70,100 A 30 30 0 1 0 130,100 Z"
    );
}

#[test]
fn full_pie_has_no_inner_circle() {
    let segments = build_donut_segments(0.0, 4.0);
    let path = donut_segment_path(&segments[0], geometry(0.0));
    assert_eq!(path.matches('M').count(), 1);
    assert_eq!(path.matches(" A ").count(), 2);
}

#[test]
fn quarter_slice_uses_small_arc_flag() {
    let segment = DonutSegment {
        start_angle: 0.0,
        end_angle: FRAC_PI_2,
        label: "Passed".to_owned(),
        value: 1.0,
        percentage: 25.0,
    };

    let path = donut_segment_path(&segment, geometry(30.0));

    assert_eq!(
        path,
        "M 150,100 A 50 50 0 0 1 100,150 L 100,130 A 30 30 0 0 0 130,100 Z"
    );
}

#[test]
fn wide_slice_uses_large_arc_flag_and_pie_closes_at_centre() {
    let segment = DonutSegment {
        start_angle: 0.0,
        end_angle: 1.5 * PI,
        label: "Passed".to_owned(),
        value: 3.0,
        percentage: 75.0,
    };

    let path = donut_segment_path(&segment, geometry(0.0));

    assert_eq!(path, "M 150,100 A 50 50 0 1 1 100,50 L 100,100 Z");
}

#[test]
fn amounts_use_decimal_byte_units() {
    assert_eq!(format_amount(512.0), "512 B");
    assert_eq!(format_amount(1_500.0), "1.5 kB");
    assert_eq!(format_amount(2_345_678.0), "2.35 MB");
    assert_eq!(format_amount(f64::INFINITY), "0 B");
}

#[test]
fn percentages_and_ratios_have_one_decimal() {
    assert_eq!(format_percentage(66.666), "66.7%");
    assert_eq!(format_percentage(f64::NAN), "0.0%");
    assert_eq!(format_ratio(1.26), "1.3");
    assert_eq!(format_ratio(0.96), "1.0");
}

#[test]
fn days_format_as_iso_dates() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
    assert_eq!(format_day(day), "2024-02-29");
    assert_eq!(format_day_millis(day_to_epoch_millis(day)), "2024-02-29");
    assert_eq!(format_day_millis(f64::NAN), "");
}
