//! Type inference for untyped text fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use merklediff_core::{ColumnType, Value};

/// Naive layouts tried after RFC 3339, interpreted as UTC
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Infer the most specific value for a text field.
///
/// Tried in order: i64, f64, bool, timestamp, then plain text.
pub fn infer_value(field: &str) -> Value {
    if let Ok(i) = field.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(x) = field.parse::<f64>() {
        return Value::Float(x);
    }
    if let Some(b) = parse_bool(field) {
        return Value::Bool(b);
    }
    if let Some(ts) = parse_timestamp(field) {
        return Value::Timestamp(ts);
    }
    Value::Text(field.to_string())
}

/// Column type reported for an inferred value
pub fn inferred_type(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::Text,
        other => other.column_type(),
    }
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`
pub fn parse_timestamp(field: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(field) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(field, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(field, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_int_before_float() {
        assert_eq!(infer_value("42"), Value::Int(42));
        assert_eq!(infer_value("-7"), Value::Int(-7));
        assert_eq!(infer_value("4.5"), Value::Float(4.5));
    }

    #[test]
    fn test_zero_and_one_are_ints() {
        assert_eq!(infer_value("1"), Value::Int(1));
        assert_eq!(infer_value("0"), Value::Int(0));
    }

    #[test]
    fn test_bool_spellings() {
        for s in ["true", "TRUE", "True", "t", "T"] {
            assert_eq!(infer_value(s), Value::Bool(true), "{}", s);
        }
        for s in ["false", "FALSE", "False", "f", "F"] {
            assert_eq!(infer_value(s), Value::Bool(false), "{}", s);
        }
        assert_eq!(infer_value("yes"), Value::Text("yes".into()));
    }

    #[test]
    fn test_timestamp_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            infer_value("2024-03-01T12:30:00Z"),
            Value::Timestamp(expected)
        );
        assert_eq!(
            infer_value("2024-03-01 12:30:00"),
            Value::Timestamp(expected)
        );
        assert_eq!(
            infer_value("2024-03-01"),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rfc3339_offset_is_normalized() {
        let ts = parse_timestamp("2024-03-01T14:30:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_fallback_is_text() {
        assert_eq!(infer_value(""), Value::Text(String::new()));
        assert_eq!(infer_value("alice"), Value::Text("alice".into()));
        assert_eq!(inferred_type(&infer_value("alice")), ColumnType::Text);
    }
}
