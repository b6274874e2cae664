use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::aggregate::percentage_shares;

pub const PASSED_LABEL: &str = "Passed";
pub const FAILED_LABEL: &str = "Failed";

/// Angular span of one donut category, in radians from angle `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSegment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub label: String,
    pub value: f64,
    pub percentage: f64,
}

impl DonutSegment {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    #[must_use]
    pub fn is_full_ring(&self) -> bool {
        self.sweep() >= TAU
    }
}

pub type DonutSegments = SmallVec<[DonutSegment; 2]>;

/// Pass/fail donut.
///
/// When one side is zero the other side is a single full ring (`0..2π`, 100%)
/// rather than a full arc next to a zero-length one. `(0, 0)` yields no
/// segments.
#[must_use]
pub fn build_donut_segments(passed: f64, failed: f64) -> DonutSegments {
    build_ring_segments(&[(PASSED_LABEL, passed), (FAILED_LABEL, failed)])
}

/// Splits the full circle between labelled values.
///
/// Zero, negative and non-finite values get no segment. Spans are cumulative
/// from `0` and the last one ends exactly at `2π`.
#[must_use]
pub fn build_ring_segments(entries: &[(&str, f64)]) -> DonutSegments {
    let visible: SmallVec<[(&str, f64); 2]> = entries
        .iter()
        .copied()
        .filter(|(_, value)| value.is_finite() && *value > 0.0)
        .collect();

    if visible.is_empty() {
        return SmallVec::new();
    }
    let values: SmallVec<[f64; 2]> = visible.iter().map(|(_, value)| *value).collect();
    let shares = percentage_shares(&values);

    let last = visible.len() - 1;
    let mut start_angle = 0.0;
    visible
        .into_iter()
        .zip(shares)
        .enumerate()
        .map(|(index, ((label, value), share))| {
            let fraction = share / 100.0;
            let end_angle = if index == last {
                TAU
            } else {
                start_angle + fraction * TAU
            };
            let segment = DonutSegment {
                start_angle,
                end_angle,
                label: label.to_owned(),
                value,
                percentage: if index == last && last == 0 {
                    100.0
                } else {
                    share
                },
            };
            start_angle = end_angle;
            segment
        })
        .collect()
}
