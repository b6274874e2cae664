use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::ResultRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRate {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percent of results with `grade >= 1`; `0.0` without results.
    pub success_rate: f64,
}

#[must_use]
pub fn compute_pass_rate(results: &[ResultRecord]) -> PassRate {
    let total = results.len();
    let passed = results.iter().filter(|result| result.passed()).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    };

    trace!(total, passed, "computed pass rate");
    PassRate {
        total,
        passed,
        failed: total - passed,
        success_rate,
    }
}
