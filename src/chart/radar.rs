use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryTotal;
use crate::core::{ChartPoint, LinearScale};

/// Fewest categories that form a radar polygon.
pub const MIN_RADAR_CATEGORIES: usize = 3;

/// Radar vertex relative to the radar centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub distance: f64,
    pub label: String,
    pub value: f64,
}

impl RadarPoint {
    #[must_use]
    pub fn position(&self) -> ChartPoint {
        ChartPoint::new(self.x, self.y)
    }
}

/// Places category `i` of `n` at angle `2π·i/n` and distance
/// `scale.map(amount)` from the centre.
///
/// Returns no points below [`MIN_RADAR_CATEGORIES`].
#[must_use]
pub fn build_radar_points(categories: &[CategoryTotal], scale: LinearScale) -> Vec<RadarPoint> {
    let count = categories.len();
    if count < MIN_RADAR_CATEGORIES {
        return Vec::new();
    }

    categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let angle = TAU * index as f64 / count as f64;
            let distance = scale.map(category.amount);
            RadarPoint {
                x: distance * angle.cos(),
                y: distance * angle.sin(),
                angle,
                distance,
                label: category.category.clone(),
                value: category.amount,
            }
        })
        .collect()
}

/// Outer end of each radar axis, relative to the centre.
#[must_use]
pub fn radar_spokes(count: usize, radius: f64) -> Vec<ChartPoint> {
    if count < MIN_RADAR_CATEGORIES {
        return Vec::new();
    }
    (0..count)
        .map(|index| {
            let angle = TAU * index as f64 / count as f64;
            ChartPoint::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
