use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use progress_charts::ChartError;
use progress_charts::model::{
    RawNumber, RawObject, RawRecord, RawResult, RawTimestamp, TransactionKind, UNKNOWN_NAME,
    normalize_record_in, normalize_result_in, parse_payload_json_in,
};

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

#[test]
fn empty_raw_record_gets_safe_defaults() {
    let record = normalize_record_in(RawRecord::default(), &Utc);

    assert_eq!(record.id, 0);
    assert_eq!(record.amount, 0.0);
    assert_eq!(record.created_at, DateTime::UNIX_EPOCH);
    assert_eq!(record.object.name, UNKNOWN_NAME);
    assert_eq!(record.object.kind, UNKNOWN_NAME);
    assert_eq!(record.kind, TransactionKind::Other(String::new()));
}

#[test]
fn numeric_strings_and_blank_names_are_coerced() {
    let raw = RawRecord {
        id: Some(RawNumber::Text("42".to_owned())),
        amount: Some(RawNumber::Text(" 1250.5 ".to_owned())),
        created_at: Some(RawTimestamp::Text("2024-03-01T10:00:00Z".to_owned())),
        object_id: None,
        object: Some(RawObject {
            id: Some(RawNumber::Number(7.0)),
            name: Some("  ".to_owned()),
            kind: Some("project".to_owned()),
        }),
        kind: Some("xp".to_owned()),
    };

    let record = normalize_record_in(raw, &Utc);

    assert_eq!(record.id, 42);
    assert_eq!(record.amount, 1250.5);
    assert_eq!(record.created_at, utc(2024, 3, 1, 10));
    assert_eq!(record.object_id, 7);
    assert_eq!(record.object.name, UNKNOWN_NAME);
    assert_eq!(record.object.kind, "project");
    assert_eq!(record.kind, TransactionKind::Xp);
}

#[test]
fn malformed_amount_becomes_zero() {
    let raw = RawRecord {
        amount: Some(RawNumber::Text("lots".to_owned())),
        ..RawRecord::default()
    };
    assert_eq!(normalize_record_in(raw, &Utc).amount, 0.0);
}

#[test]
fn date_only_timestamps_are_local_midnight() {
    let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let raw = RawRecord {
        created_at: Some(RawTimestamp::Text("2024-01-01".to_owned())),
        ..RawRecord::default()
    };

    let record = normalize_record_in(raw, &plus_two);

    assert_eq!(record.created_at, utc(2023, 12, 31, 22));
    assert_eq!(
        record.created_at.with_timezone(&plus_two).date_naive(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("date")
    );
}

#[test]
fn epoch_millis_timestamps_are_accepted() {
    let raw = RawResult {
        grade: Some(RawNumber::Number(1.0)),
        created_at: Some(RawTimestamp::Millis(1_704_067_200_000.0)),
        ..RawResult::default()
    };

    let result = normalize_result_in(raw, &Utc);
    assert_eq!(result.created_at, utc(2024, 1, 1, 0));
    assert!(result.passed());
}

#[test]
fn transaction_kinds_parse_from_wire_names() {
    assert_eq!(TransactionKind::parse("up"), TransactionKind::Up);
    assert_eq!(TransactionKind::parse("down"), TransactionKind::Down);
    assert_eq!(TransactionKind::parse("level"), TransactionKind::Level);
    assert_eq!(
        TransactionKind::parse("skill_go"),
        TransactionKind::Skill("go".to_owned())
    );
    assert_eq!(
        TransactionKind::parse("skill_"),
        TransactionKind::Other("skill_".to_owned())
    );
    assert_eq!(TransactionKind::Skill("go".to_owned()).as_wire(), "skill_go");
}

#[test]
fn payload_is_partitioned_by_transaction_kind() {
    let payload = r#"{
        "data": {
            "transaction": [
                {"id": 1, "amount": 100, "createdAt": "2024-01-01T08:00:00Z", "type": "xp",
                 "object": {"id": 10, "name": "go-reloaded", "type": "project"}},
                {"id": 2, "amount": 300, "createdAt": "2024-01-02T08:00:00Z", "type": "up"},
                {"id": 3, "amount": 200, "createdAt": "2024-01-03T08:00:00Z", "type": "down"},
                {"id": 4, "amount": 35, "createdAt": "2024-01-04T08:00:00Z", "type": "skill_go"},
                {"id": 5, "amount": 9, "createdAt": "2024-01-05T08:00:00Z", "type": "level"}
            ],
            "result": [
                {"id": 1, "grade": 1, "createdAt": "2024-01-01T08:00:00Z"},
                {"id": 2, "grade": null, "createdAt": "2024-01-02T08:00:00Z"}
            ]
        }
    }"#;

    let input = parse_payload_json_in(payload, &Utc).expect("parse payload");

    assert_eq!(input.xp.len(), 1);
    assert_eq!(input.xp[0].object.name, "go-reloaded");
    assert_eq!(input.audits_done.len(), 1);
    assert_eq!(input.audits_received.len(), 1);
    assert_eq!(input.skills.len(), 1);
    assert_eq!(input.results.len(), 2);
    assert_eq!(input.results[1].grade, 0.0);
    assert!(!input.is_empty());
}

#[test]
fn graphql_errors_are_reported_as_upstream_failures() {
    let payload = r#"{"errors": [{"message": "JWT expired"}, {"message": "denied"}]}"#;

    let err = parse_payload_json_in(payload, &Utc).expect_err("must fail");
    match err {
        ChartError::Upstream(message) => assert_eq!(message, "JWT expired; denied"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_data_block_is_invalid() {
    let err = parse_payload_json_in("{}", &Utc).expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn malformed_json_is_invalid() {
    let err = parse_payload_json_in("{not json", &Utc).expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn mistyped_record_is_coerced_next_to_a_good_one() {
    let payload = r#"{
        "data": {
            "transaction": [
                {"id": 1, "amount": 400, "createdAt": "2024-01-01T08:00:00Z", "type": "xp",
                 "object": {"id": 10, "name": "ascii-art", "type": "project"}},
                {"id": 2, "amount": true, "createdAt": {"at": 1}, "type": "xp",
                 "object": {"name": 42, "type": ["project"]}},
                {"id": 3, "amount": 50, "createdAt": "2024-01-02T08:00:00Z", "type": "xp",
                 "object": "x"},
                {"id": 4, "amount": 5, "type": 7}
            ],
            "result": [
                "not a result",
                {"id": 1, "grade": "1", "createdAt": "2024-01-01T08:00:00Z"}
            ]
        }
    }"#;

    let input = parse_payload_json_in(payload, &Utc).expect("parse payload");

    assert_eq!(input.xp.len(), 3);
    assert_eq!(input.xp[0].amount, 400.0);
    assert_eq!(input.xp[0].object.name, "ascii-art");

    let mistyped = &input.xp[1];
    assert_eq!(mistyped.id, 2);
    assert_eq!(mistyped.amount, 0.0);
    assert_eq!(mistyped.created_at, DateTime::UNIX_EPOCH);
    assert_eq!(mistyped.object.name, UNKNOWN_NAME);
    assert_eq!(mistyped.object.kind, UNKNOWN_NAME);

    assert_eq!(input.xp[2].amount, 50.0);
    assert_eq!(input.xp[2].object.name, UNKNOWN_NAME);

    assert_eq!(input.results.len(), 2);
    assert_eq!(input.results[0].grade, 0.0);
    assert!(input.results[1].passed());
}

#[test]
fn non_list_collections_are_read_as_empty() {
    let payload = r#"{"data": {"transaction": {"id": 1}, "result": null}}"#;
    let input = parse_payload_json_in(payload, &Utc).expect("parse payload");
    assert!(input.is_empty());
}

#[test]
fn unrecognized_number_shapes_resolve_to_nothing() {
    let raw = RawRecord {
        amount: Some(RawNumber::Other(serde_json::json!({"value": 3}))),
        created_at: Some(RawTimestamp::Other(serde_json::Value::Bool(false))),
        ..RawRecord::default()
    };

    let record = normalize_record_in(raw, &Utc);
    assert_eq!(record.amount, 0.0);
    assert_eq!(record.created_at, DateTime::UNIX_EPOCH);
}
