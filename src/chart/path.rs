//! SVG path `d` strings for the projected geometry.
//!
//! Coordinates are printed with at most two decimals so output is stable
//! across platforms and diffs cleanly in snapshots.

use std::f64::consts::PI;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::ChartPoint;

use super::donut::DonutSegment;

/// Placement of a donut in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutGeometry {
    pub center: ChartPoint,
    pub outer_radius: f64,
    /// `0.0` draws a pie slice.
    pub inner_radius: f64,
    /// Added to every segment angle; `-π/2` starts at twelve o'clock.
    pub rotation: f64,
}

/// `M x,y L x,y ...`; `None` below two points.
#[must_use]
pub fn polyline_path(points: &[ChartPoint]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let mut path = String::new();
    for (index, point) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        push_command(&mut path, command, *point);
    }
    Some(path)
}

/// Closed polygon; `None` below three points.
#[must_use]
pub fn closed_path(points: &[ChartPoint]) -> Option<String> {
    if points.len() < 3 {
        return None;
    }
    let mut path = polyline_path(points)?;
    path.push_str(" Z");
    Some(path)
}

/// Annulus (or pie, with a zero inner radius) slice for one segment.
///
/// A single SVG arc cannot end on its own start point, so a full-ring segment
/// is emitted as two half arcs per circle; render with `fill-rule="evenodd"`
/// to keep the hole.
#[must_use]
pub fn donut_segment_path(segment: &DonutSegment, geometry: DonutGeometry) -> String {
    let outer = geometry.outer_radius.max(0.0);
    let inner = geometry.inner_radius.clamp(0.0, outer);

    if segment.is_full_ring() {
        let mut path = full_circle(geometry.center, outer, true);
        if inner > 0.0 {
            path.push(' ');
            path.push_str(&full_circle(geometry.center, inner, false));
        }
        return path;
    }

    let start = segment.start_angle + geometry.rotation;
    let end = segment.end_angle + geometry.rotation;
    let large_arc = u8::from(segment.sweep() > PI);
    let center = geometry.center;

    let mut path = String::new();
    push_command(&mut path, 'M', polar(center, outer, start));
    push_arc(&mut path, outer, large_arc, 1, polar(center, outer, end));
    if inner > 0.0 {
        push_command(&mut path, 'L', polar(center, inner, end));
        push_arc(&mut path, inner, large_arc, 0, polar(center, inner, start));
    } else {
        push_command(&mut path, 'L', center);
    }
    path.push_str(" Z");
    path
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}

fn full_circle(center: ChartPoint, radius: f64, clockwise: bool) -> String {
    let sweep = u8::from(clockwise);
    let right = ChartPoint::new(center.x + radius, center.y);
    let left = ChartPoint::new(center.x - radius, center.y);

    let mut path = String::new();
    push_command(&mut path, 'M', right);
    push_arc(&mut path, radius, 1, sweep, left);
    push_arc(&mut path, radius, 1, sweep, right);
    path.push_str(" Z");
    path
}

fn polar(center: ChartPoint, radius: f64, angle: f64) -> ChartPoint {
    ChartPoint::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

fn push_command(path: &mut String, command: char, point: ChartPoint) {
    if !path.is_empty() {
        path.push(' ');
    }
    let _ = write!(
        path,
        "{command} {},{}",
        format_coordinate(point.x),
        format_coordinate(point.y)
    );
}

fn push_arc(path: &mut String, radius: f64, large_arc: u8, sweep: u8, to: ChartPoint) {
    let radius = format_coordinate(radius);
    let _ = write!(
        path,
        " A {radius} {radius} 0 {large_arc} {sweep} {},{}",
        format_coordinate(to.x),
        format_coordinate(to.y)
    );
}
