/*
[INPUT]:  Raw JSON records from any backend schema version
[OUTPUT]: Total, default-substituting field readers
[POS]:    Decode layer - tolerant primitives shared by every model
[UPDATE]: When a new field type or timestamp spelling shows up upstream
*/

//! Tolerant decoding primitives.
//!
//! Every reader takes a fallback chain from [`keys`] and returns the first
//! usable value, or a default. None of them fail, and numeric readers never
//! produce a non-finite value.

pub mod keys;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use std::str::FromStr;

/// Ordered fallback chain: canonical key first, then legacy spellings
pub type Keys = &'static [&'static str];

/// Epoch values below this are seconds, at or above it milliseconds
pub const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// First present, non-null value along the chain
pub fn lookup<'a>(raw: &'a Value, keys: Keys) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// First nested object along the chain, or the record itself when it is flat
pub fn section<'a>(raw: &'a Value, keys: Keys) -> &'a Value {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| value.is_object())
        .unwrap_or(raw)
}

pub fn opt_number(raw: &Value, keys: Keys) -> Option<f64> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(value_to_f64)
}

pub fn number(raw: &Value, keys: Keys) -> f64 {
    opt_number(raw, keys).unwrap_or(0.0)
}

pub fn opt_decimal(raw: &Value, keys: Keys) -> Option<Decimal> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(value_to_decimal)
}

pub fn decimal(raw: &Value, keys: Keys) -> Decimal {
    opt_decimal(raw, keys).unwrap_or(Decimal::ZERO)
}

pub fn integer(raw: &Value, keys: Keys) -> i64 {
    opt_number(raw, keys)
        .map(|value| value.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        .unwrap_or(0)
}

pub fn count(raw: &Value, keys: Keys) -> u64 {
    integer(raw, keys).max(0) as u64
}

pub fn opt_text(raw: &Value, keys: Keys) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(|value| match value {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
}

pub fn text(raw: &Value, keys: Keys) -> String {
    opt_text(raw, keys).unwrap_or_default()
}

pub fn opt_flag(raw: &Value, keys: Keys) -> Option<bool> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(flag_value)
}

/// Boolean from a bare value: bools, non-zero numbers and loose spellings
pub fn flag_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" | "enabled" | "active" => Some(true),
            "false" | "no" | "0" | "off" | "disabled" | "inactive" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn flag(raw: &Value, keys: Keys) -> bool {
    opt_flag(raw, keys).unwrap_or(false)
}

/// Array at the record itself, or under the first key holding one
pub fn list<'a>(raw: &'a Value, keys: Keys) -> &'a [Value] {
    if let Value::Array(items) = raw {
        return items;
    }
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn text_list(raw: &Value, keys: Keys) -> Vec<String> {
    list(raw, keys)
        .iter()
        .filter_map(|item| match item {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Object(_) => opt_text(item, keys::MESSAGE),
            _ => None,
        })
        .collect()
}

/// Scale an epoch value to milliseconds: below 10^12 it is seconds
pub fn epoch_millis(value: i64) -> i64 {
    if value.abs() < EPOCH_MILLIS_THRESHOLD {
        value.saturating_mul(1000)
    } else {
        value
    }
}

/// Epoch milliseconds from a number, numeric string or date string
pub fn opt_epoch_millis(raw: &Value, keys: Keys) -> Option<i64> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(|value| match value {
            Value::Number(number) => number
                .as_f64()
                .filter(|n| n.is_finite())
                .map(|n| epoch_millis(n.trunc() as i64)),
            Value::String(text) => parse_timestamp_str(text).map(|at| at.timestamp_millis()),
            _ => None,
        })
}

pub fn opt_timestamp(raw: &Value, keys: Keys) -> Option<DateTime<Utc>> {
    opt_epoch_millis(raw, keys).and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Timestamp from a combined key, or from a date key paired with a time key
pub fn opt_date_time(raw: &Value, date_keys: Keys, time_keys: Keys) -> Option<DateTime<Utc>> {
    let date = opt_text(raw, date_keys);
    let time = opt_text(raw, time_keys);
    if let (Some(date), Some(time)) = (&date, &time)
        && let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        && let Some(clock) = parse_clock(time)
    {
        return Some(Utc.from_utc_datetime(&day.and_time(clock)));
    }
    opt_timestamp(raw, date_keys).or_else(|| opt_timestamp(raw, time_keys))
}

/// Accepts RFC 3339, naive `YYYY-MM-DD[ T]HH:MM:SS[.f]`, bare dates and epoch digits.
/// Naive values are read as UTC.
pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));
    }
    text.parse::<i64>()
        .ok()
        .and_then(|raw| Utc.timestamp_millis_opt(epoch_millis(raw)).single())
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text.trim(), format).ok())
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => clean_numeric(text).parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(&clean_numeric(text)),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .and_then(Decimal::from_f64)
        })
}

/// Strip currency and grouping decorations: `"$1,234.50"` -> `"1234.50"`
fn clean_numeric(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const PNL: Keys = &["net_pnl", "total_pnl"];

    #[test]
    fn lookup_walks_the_fallback_chain() {
        let raw = json!({ "net_pnl": null, "total_pnl": 12.5 });
        assert_eq!(number(&raw, PNL), 12.5);
        assert_eq!(decimal(&raw, PNL), Decimal::new(125, 1));
    }

    #[test]
    fn missing_numbers_default_to_zero() {
        let raw = json!({ "other": 1 });
        assert_eq!(number(&raw, PNL), 0.0);
        assert_eq!(decimal(&raw, PNL), Decimal::ZERO);
        assert_eq!(integer(&raw, PNL), 0);
    }

    #[test]
    fn non_numeric_strings_fall_through() {
        let raw = json!({ "net_pnl": "NaN", "total_pnl": "$1,234.50" });
        assert_eq!(number(&raw, PNL), 1234.5);
        assert_eq!(decimal(&raw, PNL), Decimal::from_str("1234.50").unwrap());
    }

    #[test]
    fn scientific_decimals_parse() {
        let raw = json!({ "net_pnl": 1e-7 });
        assert_eq!(decimal(&raw, PNL), Decimal::from_str("0.0000001").unwrap());
    }

    #[test]
    fn non_object_records_decode_to_defaults() {
        for raw in [json!(null), json!(42), json!("x"), json!([1, 2])] {
            assert_eq!(number(&raw, PNL), 0.0);
            assert_eq!(text(&raw, PNL), "");
            assert!(!flag(&raw, PNL));
            assert!(opt_timestamp(&raw, PNL).is_none());
        }
    }

    #[test]
    fn flags_accept_loose_spellings() {
        let raw = json!({ "a": "Yes", "b": 0, "c": "maybe" });
        assert!(flag(&raw, &["a"]));
        assert!(!flag(&raw, &["b"]));
        assert_eq!(opt_flag(&raw, &["c"]), None);
    }

    #[test]
    fn list_accepts_bare_arrays_and_wrapped_ones() {
        let bare = json!([1, 2, 3]);
        let wrapped = json!({ "positions": [1, 2] });
        assert_eq!(list(&bare, &["trades"]).len(), 3);
        assert_eq!(list(&wrapped, &["trades", "positions"]).len(), 2);
        assert!(list(&json!({ "trades": {} }), &["trades"]).is_empty());
    }

    #[rstest]
    #[case(1_700_000_000, 1_700_000_000_000)]
    #[case(1_700_000_000_000, 1_700_000_000_000)]
    #[case(999_999_999_999, 999_999_999_999_000)]
    #[case(0, 0)]
    fn epoch_heuristic(#[case] raw: i64, #[case] expected: i64) {
        assert_eq!(epoch_millis(raw), expected);
    }

    #[rstest]
    #[case(json!({ "t": 1_700_000_000 }))]
    #[case(json!({ "t": 1_700_000_000_000i64 }))]
    #[case(json!({ "t": "1700000000" }))]
    #[case(json!({ "t": "2023-11-14T22:13:20Z" }))]
    #[case(json!({ "t": "2023-11-14 22:13:20" }))]
    fn timestamps_in_any_spelling_agree(#[case] raw: Value) {
        let at = opt_timestamp(&raw, &["t"]).expect("timestamp");
        assert_eq!(at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn date_and_time_keys_combine() {
        let raw = json!({ "exit_date": "2024-11-04", "exit_time": "15:45:00" });
        let at = opt_date_time(&raw, &["exit_date"], &["exit_time"]).expect("combined");
        assert_eq!(at.to_rfc3339(), "2024-11-04T15:45:00+00:00");
    }
}
