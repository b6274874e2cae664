use std::collections::BTreeMap;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::local_day_in;
use crate::model::Record;

use super::{finite_amount, saturating_add};

/// Longest trailing window [`aggregate_recent_days`] will build.
pub const MAX_RECENT_DAYS: u32 = 366;

/// Records sharing one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub amount: f64,
    pub cumulative_amount: f64,
}

/// Groups records by local calendar day.
#[must_use]
pub fn aggregate_by_date(records: &[Record]) -> Vec<DateBucket> {
    aggregate_by_date_in(records, &Local)
}

/// Groups records by calendar day as seen in `tz`, sums each day and adds a
/// running total.
///
/// Buckets come out strictly ascending by date. Two instants on the same
/// wall-clock day always share a bucket, whatever their time of day.
#[must_use]
pub fn aggregate_by_date_in<Tz: TimeZone>(records: &[Record], tz: &Tz) -> Vec<DateBucket> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        let total = days
            .entry(local_day_in(record.created_at, tz))
            .or_insert(0.0);
        *total = saturating_add(*total, finite_amount(record.amount));
    }

    trace!(
        records = records.len(),
        buckets = days.len(),
        "aggregated records by date"
    );
    with_running_total(days)
}

/// Daily totals for the `days` calendar days ending on `now`'s day, inclusive.
///
/// Every day of the window gets a bucket, zero-filled when idle; the running
/// total starts at the window. Records outside the window are ignored.
/// `days` is capped at [`MAX_RECENT_DAYS`].
#[must_use]
pub fn aggregate_recent_days<Tz: TimeZone>(
    records: &[Record],
    now: DateTime<Utc>,
    days: u32,
    tz: &Tz,
) -> Vec<DateBucket> {
    if days == 0 {
        return Vec::new();
    }
    let days = days.min(MAX_RECENT_DAYS);

    let last = local_day_in(now, tz);
    let Some(first) = last.checked_sub_days(Days::new(u64::from(days - 1))) else {
        return Vec::new();
    };

    let mut window: BTreeMap<NaiveDate, f64> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| (day, 0.0))
        .collect();

    for record in records {
        if let Some(total) = window.get_mut(&local_day_in(record.created_at, tz)) {
            *total = saturating_add(*total, finite_amount(record.amount));
        }
    }

    trace!(
        records = records.len(),
        days,
        %last,
        "aggregated recent activity"
    );
    with_running_total(window)
}

fn with_running_total(days: BTreeMap<NaiveDate, f64>) -> Vec<DateBucket> {
    let mut cumulative_amount = 0.0;
    days.into_iter()
        .map(|(date, amount)| {
            cumulative_amount = saturating_add(cumulative_amount, amount);
            DateBucket {
                date,
                amount,
                cumulative_amount,
            }
        })
        .collect()
}
