use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{
    AuditSummary, CategoryKey, CategoryTotal, DateBucket, PassRate, aggregate_by_category,
    aggregate_by_date_in, aggregate_peak_by_category, aggregate_recent_days,
    compute_audit_summary_in, compute_pass_rate,
};
use crate::model::DashboardInput;

use super::DashboardConfig;

/// Immutable aggregation of one fetch cycle.
///
/// Built once from the fetched records, handed to the chart builders and
/// dropped when the next fetch completes; nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub xp_total: f64,
    pub xp_by_date: Vec<DateBucket>,
    pub xp_by_project: Vec<CategoryTotal>,
    pub recent_activity: Vec<DateBucket>,
    pub audit: AuditSummary,
    pub pass_rate: PassRate,
    pub skills: Vec<CategoryTotal>,
}

impl DashboardSnapshot {
    /// Builds a snapshot with calendar grouping in local time.
    #[must_use]
    pub fn build(input: &DashboardInput, config: &DashboardConfig, now: DateTime<Utc>) -> Self {
        Self::build_in(input, config, now, &Local)
    }

    /// Builds a snapshot with calendar grouping in `tz`.
    ///
    /// `now` anchors the recent-activity window; the wall clock is never read.
    #[must_use]
    pub fn build_in<Tz: TimeZone>(
        input: &DashboardInput,
        config: &DashboardConfig,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        let xp_by_date = aggregate_by_date_in(&input.xp, tz);
        let xp_total = xp_by_date
            .last()
            .map_or(0.0, |bucket| bucket.cumulative_amount);

        let snapshot = Self {
            generated_at: now,
            xp_total,
            xp_by_project: aggregate_by_category(&input.xp, |record| {
                CategoryKey::ObjectName.key(record)
            }),
            recent_activity: aggregate_recent_days(&input.xp, now, config.recent_days, tz),
            audit: compute_audit_summary_in(
                &input.audits_done,
                &input.audits_received,
                config.zero_received_ratio,
                tz,
            ),
            pass_rate: compute_pass_rate(&input.results),
            skills: aggregate_peak_by_category(&input.skills, |record| {
                CategoryKey::SkillName.key(record)
            }),
            xp_by_date,
        };

        debug!(
            xp_days = snapshot.xp_by_date.len(),
            projects = snapshot.xp_by_project.len(),
            skills = snapshot.skills.len(),
            audit_months = snapshot.audit.history.len(),
            results = snapshot.pass_rate.total,
            "built dashboard snapshot"
        );
        snapshot
    }

    #[must_use]
    pub fn recent_activity_total(&self) -> f64 {
        self.recent_activity
            .last()
            .map_or(0.0, |bucket| bucket.cumulative_amount)
    }
}
