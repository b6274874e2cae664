use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryTotal;
use crate::core::{LinearScale, make_linear_scale};

/// Bars drawn when the caller does not say otherwise.
pub const DEFAULT_MAX_BARS: usize = 10;

/// Deterministic bar geometry in pixel coordinates; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub value: f64,
    pub percentage: f64,
}

/// X scale for `count` bars: slot `i` spans `[i, i + 1]` of the domain.
#[must_use]
pub fn bar_slot_scale(count: usize, range: (f64, f64)) -> LinearScale {
    make_linear_scale((0.0, count as f64), range)
}

/// Projects category totals into bars.
///
/// Only the `max_bars` largest totals are kept, in their input order. Each
/// bar is centred in its slot of `x_scale` and spans from the zero baseline of
/// `y_scale` to its value. `bar_width_fn` receives the number of bars drawn.
#[must_use]
pub fn build_bar_series<W>(
    totals: &[CategoryTotal],
    x_scale: LinearScale,
    y_scale: LinearScale,
    bar_width_fn: W,
    max_bars: usize,
) -> Vec<Bar>
where
    W: Fn(usize) -> f64,
{
    let selected = top_indices_by_amount(totals, max_bars);
    if selected.is_empty() {
        return Vec::new();
    }

    let width = bar_width_fn(selected.len());
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let half_width = width * 0.5;
    let baseline_y = y_scale.map(0.0);

    selected
        .into_iter()
        .enumerate()
        .map(|(slot, index)| {
            let total = &totals[index];
            let center_x = x_scale.map(slot as f64 + 0.5);
            let value_y = y_scale.map(total.amount);
            Bar {
                x: center_x - half_width,
                y: value_y.min(baseline_y),
                width,
                height: (value_y - baseline_y).abs(),
                label: total.category.clone(),
                value: total.amount,
                percentage: total.percentage,
            }
        })
        .collect()
}

/// Number of totals [`build_bar_series`] leaves out.
#[must_use]
pub fn hidden_bar_count(total_count: usize, max_bars: usize) -> usize {
    total_count.saturating_sub(max_bars)
}

fn top_indices_by_amount(totals: &[CategoryTotal], max_bars: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..totals.len()).collect();
    ranked.sort_by_key(|&index| Reverse(OrderedFloat(totals[index].amount)));
    ranked.truncate(max_bars);
    ranked.sort_unstable();
    ranked
}
