use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

use super::record::{
    RawRecord, RawResult, Record, ResultRecord, TransactionKind, lenient_list,
    normalize_records_in, normalize_results_in,
};

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// `data` block of the dashboard query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    #[serde(default, deserialize_with = "lenient_list")]
    pub transaction: Vec<RawRecord>,
    #[serde(default, alias = "progress", deserialize_with = "lenient_list")]
    pub result: Vec<RawResult>,
}

/// Normalized records grouped by the chart that consumes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardInput {
    pub xp: Vec<Record>,
    pub audits_done: Vec<Record>,
    pub audits_received: Vec<Record>,
    pub skills: Vec<Record>,
    pub results: Vec<ResultRecord>,
}

impl DashboardInput {
    /// Partitions transactions by kind. Level and unrecognized transactions
    /// feed no chart and are dropped.
    #[must_use]
    pub fn from_records(records: Vec<Record>, results: Vec<ResultRecord>) -> Self {
        let mut input = Self {
            results,
            ..Self::default()
        };
        let mut ignored = 0usize;

        for record in records {
            match record.kind {
                TransactionKind::Xp => input.xp.push(record),
                TransactionKind::Up => input.audits_done.push(record),
                TransactionKind::Down => input.audits_received.push(record),
                TransactionKind::Skill(_) => input.skills.push(record),
                TransactionKind::Level | TransactionKind::Other(_) => ignored += 1,
            }
        }

        trace!(
            xp = input.xp.len(),
            audits_done = input.audits_done.len(),
            audits_received = input.audits_received.len(),
            skills = input.skills.len(),
            results = input.results.len(),
            ignored,
            "partitioned dashboard records"
        );
        input
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xp.is_empty()
            && self.audits_done.is_empty()
            && self.audits_received.is_empty()
            && self.skills.is_empty()
            && self.results.is_empty()
    }
}

/// Parses a dashboard query response, reading naive timestamps as local time.
pub fn parse_payload_json(input: &str) -> ChartResult<DashboardInput> {
    parse_payload_json_in(input, &Local)
}

/// Parses a dashboard query response and normalizes every record.
///
/// A response carrying GraphQL `errors` is rejected as a whole; partial data is
/// not charted.
pub fn parse_payload_json_in<Tz: TimeZone>(input: &str, tz: &Tz) -> ChartResult<DashboardInput> {
    let response: GraphQlResponse<DashboardPayload> = serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse payload json: {e}")))?;

    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ChartError::Upstream(messages));
    }

    let payload = response
        .data
        .ok_or_else(|| ChartError::InvalidData("payload has no `data` block".to_owned()))?;

    debug!(
        transactions = payload.transaction.len(),
        results = payload.result.len(),
        "normalizing dashboard payload"
    );
    let records = normalize_records_in(payload.transaction, tz);
    let results = normalize_results_in(payload.result, tz);
    Ok(DashboardInput::from_records(records, results))
}
