use chrono::{DateTime, Local, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::primitives::{epoch_millis_to_datetime, parse_timestamp_in};

/// Placeholder for names the upstream API left out.
pub const UNKNOWN_NAME: &str = "Unknown";

const SKILL_PREFIX: &str = "skill_";

/// Transaction `type` as reported by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    Xp,
    /// Audit performed by the user.
    Up,
    /// Audit received by the user.
    Down,
    Level,
    /// `skill_<name>` grants; holds `<name>`.
    Skill(String),
    Other(String),
}

impl TransactionKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "xp" => Self::Xp,
            "up" => Self::Up,
            "down" => Self::Down,
            "level" => Self::Level,
            _ => match raw.strip_prefix(SKILL_PREFIX) {
                Some(skill) if !skill.is_empty() => Self::Skill(skill.to_owned()),
                _ => Self::Other(raw.to_owned()),
            },
        }
    }

    /// Wire form, e.g. `"xp"` or `"skill_go"`.
    #[must_use]
    pub fn as_wire(&self) -> String {
        match self {
            Self::Xp => "xp".to_owned(),
            Self::Up => "up".to_owned(),
            Self::Down => "down".to_owned(),
            Self::Level => "level".to_owned(),
            Self::Skill(skill) => format!("{SKILL_PREFIX}{skill}"),
            Self::Other(other) => other.clone(),
        }
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for TransactionKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TransactionKind> for String {
    fn from(value: TransactionKind) -> Self {
        value.as_wire()
    }
}

/// Object (project, exercise, piscine) a record refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ObjectInfo {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
        }
    }
}

impl Default for ObjectInfo {
    fn default() -> Self {
        Self::new(0, UNKNOWN_NAME, UNKNOWN_NAME)
    }
}

/// Fully populated transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub object_id: i64,
    pub object: ObjectInfo,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Record {
    /// XP record with an unknown object; mostly useful for tests and fixtures.
    #[must_use]
    pub fn new(amount: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            amount,
            created_at,
            object_id: 0,
            object: ObjectInfo::default(),
            kind: TransactionKind::Xp,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: ObjectInfo) -> Self {
        self.object_id = object.id;
        self.object = object;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Fully populated result (grade) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: i64,
    pub grade: f64,
    pub created_at: DateTime<Utc>,
    pub object: ObjectInfo,
}

impl ResultRecord {
    #[must_use]
    pub fn new(grade: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            grade,
            created_at,
            object: ObjectInfo::default(),
        }
    }

    #[must_use]
    pub fn with_object(mut self, object: ObjectInfo) -> Self {
        self.object = object;
        self
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.grade >= 1.0
    }
}

/// Number as it may arrive on the wire: a JSON number or a numeric string.
/// Anything else lands in `Other` and resolves to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawNumber {
    #[must_use]
    pub fn resolve(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Timestamp as it may arrive on the wire: ISO-8601 text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(f64),
    Text(String),
    Other(Value),
}

impl RawTimestamp {
    #[must_use]
    pub fn resolve_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(millis) if millis.is_finite() => {
                epoch_millis_to_datetime(millis.round() as i64)
            }
            Self::Millis(_) => None,
            Self::Text(text) => parse_timestamp_in(text, tz),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    #[serde(default)]
    pub id: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
}

/// Transaction exactly as deserialized; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<RawNumber>,
    #[serde(default)]
    pub amount: Option<RawNumber>,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default)]
    pub object_id: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub object: Option<RawObject>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
}

/// Result exactly as deserialized; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    #[serde(default)]
    pub id: Option<RawNumber>,
    #[serde(default)]
    pub grade: Option<RawNumber>,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default, deserialize_with = "lenient")]
    pub object: Option<RawObject>,
}

/// Reads any JSON value, keeping it only when it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            warn!(error = %err, "ignoring mistyped field");
            Ok(None)
        }
    }
}

/// Reads a JSON array element by element; entries of the wrong shape become
/// `T::default()` and a non-array becomes an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(value = %other, "expected a list, ignoring");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                warn!(error = %err, "coercing mistyped entry to defaults");
                T::default()
            })
        })
        .collect())
}

/// Normalizes a transaction, reading naive timestamps as local time.
#[must_use]
pub fn normalize_record(raw: RawRecord) -> Record {
    normalize_record_in(raw, &Local)
}

/// Normalizes a transaction, filling every missing or malformed field with a
/// safe default: names become `"Unknown"`, amounts and ids become `0`, and an
/// unusable timestamp becomes the Unix epoch.
#[must_use]
pub fn normalize_record_in<Tz: TimeZone>(raw: RawRecord, tz: &Tz) -> Record {
    let id = resolve_id(raw.id.as_ref());
    let amount = resolve_amount(raw.amount.as_ref(), id, "amount");
    let created_at = resolve_timestamp(raw.created_at.as_ref(), id, tz);
    let object = normalize_object(raw.object);
    let object_id = match raw.object_id.as_ref() {
        Some(_) => resolve_id(raw.object_id.as_ref()),
        None => object.id,
    };
    let kind = raw
        .kind
        .as_deref()
        .map(TransactionKind::parse)
        .unwrap_or_default();

    Record {
        id,
        amount,
        created_at,
        object_id,
        object,
        kind,
    }
}

#[must_use]
pub fn normalize_records_in<Tz: TimeZone>(raws: Vec<RawRecord>, tz: &Tz) -> Vec<Record> {
    raws.into_iter()
        .map(|raw| normalize_record_in(raw, tz))
        .collect()
}

#[must_use]
pub fn normalize_result(raw: RawResult) -> ResultRecord {
    normalize_result_in(raw, &Local)
}

#[must_use]
pub fn normalize_result_in<Tz: TimeZone>(raw: RawResult, tz: &Tz) -> ResultRecord {
    let id = resolve_id(raw.id.as_ref());
    ResultRecord {
        id,
        grade: resolve_amount(raw.grade.as_ref(), id, "grade"),
        created_at: resolve_timestamp(raw.created_at.as_ref(), id, tz),
        object: normalize_object(raw.object),
    }
}

#[must_use]
pub fn normalize_results_in<Tz: TimeZone>(raws: Vec<RawResult>, tz: &Tz) -> Vec<ResultRecord> {
    raws.into_iter()
        .map(|raw| normalize_result_in(raw, tz))
        .collect()
}

fn normalize_object(raw: Option<RawObject>) -> ObjectInfo {
    let raw = raw.unwrap_or_default();
    ObjectInfo {
        id: resolve_id(raw.id.as_ref()),
        name: non_blank_or_unknown(raw.name),
        kind: non_blank_or_unknown(raw.kind),
    }
}

fn non_blank_or_unknown(value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => UNKNOWN_NAME.to_owned(),
    }
}

fn resolve_id(raw: Option<&RawNumber>) -> i64 {
    raw.and_then(RawNumber::resolve)
        .map(|value| value as i64)
        .unwrap_or(0)
}

fn resolve_amount(raw: Option<&RawNumber>, record_id: i64, field: &'static str) -> f64 {
    match raw {
        None => 0.0,
        Some(number) => number.resolve().unwrap_or_else(|| {
            warn!(record_id, field, value = ?number, "coercing malformed number to 0");
            0.0
        }),
    }
}

fn resolve_timestamp<Tz: TimeZone>(
    raw: Option<&RawTimestamp>,
    record_id: i64,
    tz: &Tz,
) -> DateTime<Utc> {
    match raw {
        None => DateTime::UNIX_EPOCH,
        Some(timestamp) => timestamp.resolve_in(tz).unwrap_or_else(|| {
            warn!(record_id, value = ?timestamp, "coercing malformed timestamp to epoch");
            DateTime::UNIX_EPOCH
        }),
    }
}
