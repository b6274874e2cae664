use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::{first_of_month, local_month_in};
use crate::error::{ChartError, ChartResult};
use crate::model::Record;

use super::finite_amount;

/// Audit ratio reported while nothing has been received yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum ZeroReceivedRatio {
    /// Constant ratio.
    Fixed(f64),
    /// `done_amount / divisor`.
    ScaledDone(f64),
}

impl Default for ZeroReceivedRatio {
    fn default() -> Self {
        Self::Fixed(1.0)
    }
}

impl ZeroReceivedRatio {
    pub fn validate(self) -> ChartResult<Self> {
        match self {
            Self::Fixed(value) if !value.is_finite() || value < 0.0 => Err(
                ChartError::InvalidData("fixed audit ratio must be finite and >= 0".to_owned()),
            ),
            Self::ScaledDone(divisor) if !divisor.is_finite() || divisor <= 0.0 => {
                Err(ChartError::InvalidData(
                    "audit ratio divisor must be finite and > 0".to_owned(),
                ))
            }
            _ => Ok(self),
        }
    }
}

/// `done_amount / received_amount`, or `policy` when nothing was received.
#[must_use]
pub fn audit_ratio(done_amount: f64, received_amount: f64, policy: ZeroReceivedRatio) -> f64 {
    let ratio = if received_amount > 0.0 {
        done_amount / received_amount
    } else {
        match policy {
            ZeroReceivedRatio::Fixed(value) => value,
            ZeroReceivedRatio::ScaledDone(divisor) if divisor > 0.0 => done_amount / divisor,
            ZeroReceivedRatio::ScaledDone(_) => 0.0,
        }
    };
    finite_amount(ratio)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAuditPoint {
    /// `"YYYY-M"`, month not zero-padded.
    pub month_key: String,
    /// First day of the month.
    pub date: NaiveDate,
    pub done_count: usize,
    pub received_count: usize,
    pub done_amount: f64,
    pub received_amount: f64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub done_count: usize,
    pub received_count: usize,
    pub done_amount: f64,
    pub received_amount: f64,
    pub ratio: f64,
    pub up_to_date: bool,
    pub history: Vec<MonthlyAuditPoint>,
}

#[derive(Debug, Clone, Copy, Default)]
struct AuditTally {
    done_count: usize,
    received_count: usize,
    done_amount: f64,
    received_amount: f64,
}

impl AuditTally {
    fn add_done(&mut self, amount: f64) {
        self.done_count += 1;
        self.done_amount += amount;
    }

    fn add_received(&mut self, amount: f64) {
        self.received_count += 1;
        self.received_amount += amount;
    }
}

/// Audit summary with the default zero-received policy, months in local time.
#[must_use]
pub fn compute_audit_summary(done: &[Record], received: &[Record]) -> AuditSummary {
    compute_audit_summary_in(done, received, ZeroReceivedRatio::default(), &Local)
}

/// Sums both sides of the audit balance and builds the monthly history.
///
/// History holds one point per calendar month (as seen in `tz`) that has
/// activity on either side, ascending; a side without activity that month
/// reports zero.
#[must_use]
pub fn compute_audit_summary_in<Tz: TimeZone>(
    done: &[Record],
    received: &[Record],
    policy: ZeroReceivedRatio,
    tz: &Tz,
) -> AuditSummary {
    let mut overall = AuditTally::default();
    let mut months: BTreeMap<(i32, u32), AuditTally> = BTreeMap::new();

    for record in done {
        let amount = finite_amount(record.amount);
        overall.add_done(amount);
        months
            .entry(local_month_in(record.created_at, tz))
            .or_default()
            .add_done(amount);
    }
    for record in received {
        let amount = finite_amount(record.amount);
        overall.add_received(amount);
        months
            .entry(local_month_in(record.created_at, tz))
            .or_default()
            .add_received(amount);
    }

    let history: Vec<MonthlyAuditPoint> = months
        .into_iter()
        .filter_map(|((year, month), tally)| {
            let date = first_of_month(year, month)?;
            Some(MonthlyAuditPoint {
                month_key: format!("{year}-{month}"),
                date,
                done_count: tally.done_count,
                received_count: tally.received_count,
                done_amount: tally.done_amount,
                received_amount: tally.received_amount,
                ratio: audit_ratio(tally.done_amount, tally.received_amount, policy),
            })
        })
        .collect();

    let ratio = audit_ratio(overall.done_amount, overall.received_amount, policy);
    trace!(
        done = done.len(),
        received = received.len(),
        months = history.len(),
        ratio,
        "computed audit summary"
    );

    AuditSummary {
        done_count: overall.done_count,
        received_count: overall.received_count,
        done_amount: overall.done_amount,
        received_amount: overall.received_amount,
        ratio,
        up_to_date: ratio >= 1.0,
        history,
    }
}
