//! Reductions from normalized records to chart-ready series.
//!
//! Every function here is total: empty input yields an empty or zero-valued
//! result, and non-finite amounts count as zero.

pub mod audit;
pub mod by_category;
pub mod by_date;
pub mod pass_rate;

pub use audit::{
    AuditSummary, MonthlyAuditPoint, ZeroReceivedRatio, audit_ratio, compute_audit_summary,
    compute_audit_summary_in,
};
pub use by_category::{
    CategoryKey, CategoryTotal, aggregate_by_category, aggregate_peak_by_category,
};
pub use by_date::{
    DateBucket, MAX_RECENT_DAYS, aggregate_by_date, aggregate_by_date_in, aggregate_recent_days,
};
pub use pass_rate::{PassRate, compute_pass_rate};

pub(crate) fn finite_amount(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Sum of two finite amounts, held inside the finite range.
pub(crate) fn saturating_add(left: f64, right: f64) -> f64 {
    (left + right).clamp(f64::MIN, f64::MAX)
}

/// Share of each value in their sum, in percent.
///
/// Values are divided by the largest magnitude before summing so the total
/// stays finite near `f64::MAX`. A non-positive sum gives every value `0.0`.
pub(crate) fn percentage_shares(values: &[f64]) -> Vec<f64> {
    let scale = values.iter().fold(0.0f64, |peak, value| peak.max(value.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return vec![0.0; values.len()];
    }

    let total: f64 = values.iter().map(|value| value / scale).sum();
    values
        .iter()
        .map(|value| {
            if total > 0.0 {
                value / scale / total * 100.0
            } else {
                0.0
            }
        })
        .collect()
}
