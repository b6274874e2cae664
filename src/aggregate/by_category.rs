use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{Record, TransactionKind, UNKNOWN_NAME};

use super::{finite_amount, percentage_shares, saturating_add};

/// Total of one category and its share of the grand total, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

impl CategoryTotal {
    #[must_use]
    pub fn new(category: impl Into<String>, amount: f64, percentage: f64) -> Self {
        Self {
            category: category.into(),
            amount,
            percentage,
        }
    }
}

/// Stock grouping keys for [`aggregate_by_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    /// Project or exercise name.
    #[default]
    ObjectName,
    /// Object type, e.g. `project` or `piscine`.
    ObjectKind,
    /// Transaction type, e.g. `xp` or `skill_go`.
    TransactionKind,
    /// Skill name without the `skill_` prefix; other kinds use their wire name.
    SkillName,
}

impl CategoryKey {
    #[must_use]
    pub fn key(self, record: &Record) -> String {
        match self {
            Self::ObjectName => record.object.name.clone(),
            Self::ObjectKind => record.object.kind.clone(),
            Self::TransactionKind => record.kind.as_wire(),
            Self::SkillName => match &record.kind {
                TransactionKind::Skill(skill) => skill.clone(),
                other => other.as_wire(),
            },
        }
    }
}

/// Sums amounts per `key_fn(record)` and sorts descending by amount.
///
/// Blank keys fall into `"Unknown"`. Ties keep the order in which categories
/// were first seen. When the grand total is not positive every percentage is
/// `0.0`.
#[must_use]
pub fn aggregate_by_category<F>(records: &[Record], key_fn: F) -> Vec<CategoryTotal>
where
    F: Fn(&Record) -> String,
{
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let total = groups.entry(category_of(record, &key_fn)).or_insert(0.0);
        *total = saturating_add(*total, finite_amount(record.amount));
    }

    trace!(
        records = records.len(),
        categories = groups.len(),
        "aggregated records by category"
    );
    into_sorted_totals(groups)
}

/// Keeps the largest amount per category instead of the sum.
///
/// Skill grants repeat with increasing levels, so the peak is the current
/// level. Percentages are relative to the sum of peaks.
#[must_use]
pub fn aggregate_peak_by_category<F>(records: &[Record], key_fn: F) -> Vec<CategoryTotal>
where
    F: Fn(&Record) -> String,
{
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let amount = finite_amount(record.amount);
        groups
            .entry(category_of(record, &key_fn))
            .and_modify(|peak| *peak = peak.max(amount))
            .or_insert(amount);
    }

    trace!(
        records = records.len(),
        categories = groups.len(),
        "aggregated peak amount by category"
    );
    into_sorted_totals(groups)
}

fn category_of<F>(record: &Record, key_fn: &F) -> String
where
    F: Fn(&Record) -> String,
{
    let key = key_fn(record);
    if key.trim().is_empty() {
        UNKNOWN_NAME.to_owned()
    } else {
        key
    }
}

fn into_sorted_totals(groups: IndexMap<String, f64>) -> Vec<CategoryTotal> {
    let amounts: Vec<f64> = groups.values().copied().collect();
    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .zip(percentage_shares(&amounts))
        .map(|((category, amount), percentage)| CategoryTotal {
            category,
            amount,
            percentage,
        })
        .collect();

    // Stable sort keeps first-seen order among equal amounts.
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}
