use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn datetime_to_epoch_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Epoch milliseconds of the day's UTC midnight.
///
/// Calendar days are positioned on the UTC grid so that consecutive days are
/// always exactly 86 400 000 ms apart, independent of DST.
#[must_use]
pub fn day_to_epoch_millis(day: NaiveDate) -> f64 {
    datetime_to_epoch_millis(day.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[must_use]
pub fn epoch_millis_to_day(millis: f64) -> Option<NaiveDate> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64).map(|time| time.date_naive())
}

#[must_use]
pub fn epoch_millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Calendar day of `instant` as seen on a wall clock in `tz`.
#[must_use]
pub fn local_day_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// `(year, month)` of `instant` as seen on a wall clock in `tz`.
#[must_use]
pub fn local_month_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> (i32, u32) {
    let day = local_day_in(instant, tz);
    (day.year(), day.month())
}

#[must_use]
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Resolves a wall-clock time in `tz` to an instant.
///
/// Ambiguous times take the earlier instant; times skipped by a DST gap fall
/// back to reading the wall clock as UTC.
#[must_use]
pub fn local_to_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|time| time.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Parses the timestamp shapes the upstream API produces.
///
/// RFC 3339 strings keep their offset. Naive date-times and bare dates carry
/// no offset and are read as wall-clock time in `tz`, so `"2024-01-01"` lands
/// on January 1st in that zone rather than on UTC midnight.
#[must_use]
pub fn parse_timestamp_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(local_to_utc(naive, tz));
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(|day| local_to_utc(day.and_time(chrono::NaiveTime::MIN), tz))
}
