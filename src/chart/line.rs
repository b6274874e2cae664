use serde::{Deserialize, Serialize};

use crate::aggregate::DateBucket;
use crate::core::{ChartPoint, LinearScale, ScaleValue};

/// Fewest points that form a line.
pub const MIN_LINE_POINTS: usize = 2;

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Maps cumulative date buckets to one point per bucket, in order.
///
/// All buckets are projected; callers treat fewer than [`MIN_LINE_POINTS`]
/// points as "not enough data" instead of drawing.
#[must_use]
pub fn build_line_series(
    buckets: &[DateBucket],
    x_scale: LinearScale,
    y_scale: LinearScale,
) -> Vec<ChartPoint> {
    build_time_series(
        buckets,
        |bucket| ScaleValue::Day(bucket.date),
        |bucket| bucket.cumulative_amount,
        x_scale,
        y_scale,
    )
}

/// Generic form of [`build_line_series`] for any sample type.
#[must_use]
pub fn build_time_series<S, X, Y>(
    samples: &[S],
    x_of: X,
    y_of: Y,
    x_scale: LinearScale,
    y_scale: LinearScale,
) -> Vec<ChartPoint>
where
    X: Fn(&S) -> ScaleValue,
    Y: Fn(&S) -> f64,
{
    samples
        .iter()
        .map(|sample| ChartPoint::new(x_scale.map(x_of(sample)), y_scale.map(y_of(sample))))
        .collect()
}

#[must_use]
pub fn has_enough_points_for_line(points: &[ChartPoint]) -> bool {
    points.len() >= MIN_LINE_POINTS
}

/// Splits a polyline into adjacent segments; empty below two points.
#[must_use]
pub fn line_segments(points: &[ChartPoint]) -> Vec<LineSegment> {
    points
        .windows(2)
        .map(|pair| LineSegment {
            x1: pair[0].x,
            y1: pair[0].y,
            x2: pair[1].x,
            y2: pair[1].y,
        })
        .collect()
}
