use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, day_to_epoch_millis};
use crate::error::{ChartError, ChartResult};

/// Value accepted by a scale domain.
///
/// Dates are normalized to milliseconds since the Unix epoch before any
/// interpolation, so numeric and temporal domains share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScaleValue {
    Number(f64),
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

impl ScaleValue {
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Instant(time) => datetime_to_epoch_millis(time),
            Self::Day(day) => day_to_epoch_millis(day),
        }
    }

    #[must_use]
    pub fn is_temporal(self) -> bool {
        !matches!(self, Self::Number(_))
    }
}

impl From<f64> for ScaleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for ScaleValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<NaiveDate> for ScaleValue {
    fn from(value: NaiveDate) -> Self {
        Self::Day(value)
    }
}

/// Linear mapping from a data domain to a pixel range.
///
/// Inputs outside the domain are clamped, so mapped values never leave the
/// range. A degenerate domain maps everything to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: ScaleValue,
    domain_end: ScaleValue,
    range_start: f64,
    range_end: f64,
}

/// Builds a [`LinearScale`]. Never fails: non-finite range endpoints are read
/// as `0.0` and a non-finite or zero-width domain is treated as degenerate.
#[must_use]
pub fn make_linear_scale<D0, D1>(domain: (D0, D1), range: (f64, f64)) -> LinearScale
where
    D0: Into<ScaleValue>,
    D1: Into<ScaleValue>,
{
    LinearScale {
        domain_start: domain.0.into(),
        domain_end: domain.1.into(),
        range_start: finite_or_zero(range.0),
        range_end: finite_or_zero(range.1),
    }
}

impl LinearScale {
    #[must_use]
    pub fn domain(self) -> (ScaleValue, ScaleValue) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        let span = self.domain_end.to_f64() - self.domain_start.to_f64();
        !span.is_finite() || span == 0.0
    }

    #[must_use]
    pub fn range_midpoint(self) -> f64 {
        (self.range_start + self.range_end) * 0.5
    }

    /// Maps a domain value to the pixel range.
    #[must_use]
    pub fn map(self, value: impl Into<ScaleValue>) -> f64 {
        if self.is_degenerate() {
            return self.range_midpoint();
        }

        let value = value.into().to_f64();
        if !value.is_finite() {
            return self.range_start;
        }

        let start = self.domain_start.to_f64();
        let span = self.domain_end.to_f64() - start;
        let t = ((value - start) / span).clamp(0.0, 1.0);
        // Weighted form keeps both endpoints exact.
        self.range_start * (1.0 - t) + self.range_end * t
    }

    /// Maps a pixel back into the numeric domain (epoch milliseconds for dates).
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let start = self.domain_start.to_f64();
        let range_span = self.range_end - self.range_start;
        if self.is_degenerate() || range_span == 0.0 || !pixel.is_finite() {
            return start;
        }

        let t = ((pixel - self.range_start) / range_span).clamp(0.0, 1.0);
        start * (1.0 - t) + self.domain_end.to_f64() * t
    }

    /// Evenly spaced domain values including both endpoints.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let start = self.domain_start.to_f64();
        if self.is_degenerate() {
            return if start.is_finite() { vec![start] } else { Vec::new() };
        }

        let end = self.domain_end.to_f64();
        let n = count.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                start * (1.0 - t) + end * t
            })
            .collect()
    }
}

/// Controls the headroom `infer_extent_tuned` adds above numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentTuning {
    pub headroom_ratio: f64,
    pub min_headroom: f64,
}

impl Default for ExtentTuning {
    fn default() -> Self {
        Self {
            headroom_ratio: 0.05,
            min_headroom: 1.0,
        }
    }
}

impl ExtentTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.headroom_ratio.is_finite() || self.headroom_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "extent headroom ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.min_headroom.is_finite() || self.min_headroom <= 0.0 {
            return Err(ChartError::InvalidData(
                "extent minimum headroom must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Inclusive data extent suitable as a scale domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub start: ScaleValue,
    pub end: ScaleValue,
}

impl Extent {
    #[must_use]
    pub fn new(start: impl Into<ScaleValue>, end: impl Into<ScaleValue>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    #[must_use]
    pub fn as_domain(self) -> (ScaleValue, ScaleValue) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        (self.start.to_f64(), self.end.to_f64())
    }
}

#[must_use]
pub fn infer_extent<V>(values: &[V]) -> Extent
where
    V: Into<ScaleValue> + Copy,
{
    infer_extent_tuned(values, ExtentTuning::default())
}

/// Computes the extent of `values`.
///
/// Temporal inputs yield `[earliest, latest]`. Numeric inputs yield
/// `[min, max + headroom]` where headroom is `|max| * headroom_ratio`, or
/// `min_headroom` when that product is zero. Empty (or all non-finite) input
/// yields `[0, 1]`.
#[must_use]
pub fn infer_extent_tuned<V>(values: &[V], tuning: ExtentTuning) -> Extent
where
    V: Into<ScaleValue> + Copy,
{
    let values: Vec<ScaleValue> = values
        .iter()
        .map(|value| (*value).into())
        .filter(|value| value.to_f64().is_finite())
        .collect();

    let (Some(first), Some(last)) = (
        values
            .iter()
            .copied()
            .min_by(|a, b| a.to_f64().total_cmp(&b.to_f64())),
        values
            .iter()
            .copied()
            .max_by(|a, b| a.to_f64().total_cmp(&b.to_f64())),
    ) else {
        return Extent::new(0.0, 1.0);
    };

    if values.iter().all(|value| value.is_temporal()) {
        return Extent {
            start: first,
            end: last,
        };
    }

    let min = first.to_f64();
    let max = last.to_f64();
    let scaled = max.abs() * tuning.headroom_ratio;
    let headroom = if scaled > 0.0 && scaled.is_finite() {
        scaled
    } else {
        tuning.min_headroom
    };
    Extent::new(min, max + headroom)
}

/// Number of axis ticks that fit `axis_span_px` at roughly `target_spacing_px`.
#[must_use]
pub fn axis_tick_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks.max(min_ticks))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
