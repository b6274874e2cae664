pub mod payload;
pub mod record;

pub use payload::{
    DashboardInput, DashboardPayload, GraphQlError, GraphQlResponse, parse_payload_json,
    parse_payload_json_in,
};
pub use record::{
    ObjectInfo, RawNumber, RawObject, RawRecord, RawResult, RawTimestamp, Record, ResultRecord,
    TransactionKind, UNKNOWN_NAME, normalize_record, normalize_record_in, normalize_records_in,
    normalize_result, normalize_result_in, normalize_results_in,
};
