use serde::{Deserialize, Serialize};

use crate::core::LinearScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Domain value (epoch milliseconds on date axes).
    pub value: f64,
    /// Pixel position along the axis.
    pub position: f64,
    pub label: String,
}

/// Evenly spaced ticks over the scale's domain, endpoints included.
#[must_use]
pub fn build_axis_ticks<F>(scale: LinearScale, count: usize, label_fn: F) -> Vec<AxisTick>
where
    F: Fn(f64) -> String,
{
    scale
        .ticks(count)
        .into_iter()
        .map(|value| AxisTick {
            value,
            position: scale.map(value),
            label: label_fn(value),
        })
        .collect()
}
