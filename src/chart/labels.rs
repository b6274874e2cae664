use chrono::NaiveDate;

use crate::core::primitives::epoch_millis_to_day;

const KILO: f64 = 1_000.0;
const MEGA: f64 = 1_000_000.0;

/// XP amounts in the unit the platform displays: bytes, base 1000.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0 B".to_owned();
    }
    let magnitude = amount.abs();
    if magnitude >= MEGA {
        format!("{:.2} MB", amount / MEGA)
    } else if magnitude >= KILO {
        format!("{:.1} kB", amount / KILO)
    } else {
        format!("{amount:.0} B")
    }
}

#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    let percentage = if percentage.is_finite() { percentage } else { 0.0 };
    format!("{percentage:.1}%")
}

#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{ratio:.1}")
}

#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Label for a tick on a day axis, whose domain is epoch milliseconds.
#[must_use]
pub fn format_day_millis(millis: f64) -> String {
    epoch_millis_to_day(millis)
        .map(format_day)
        .unwrap_or_default()
}
