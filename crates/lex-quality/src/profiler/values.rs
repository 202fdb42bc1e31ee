//! Conversion of cell values into JSON-safe primitives.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use polars::prelude::*;
use serde_json::{Number, Value};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Collect up to `limit` distinct non-null values in first-seen order.
///
/// Expects a series with nulls already dropped; values that have no JSON form
/// (non-finite floats) are skipped.
pub(crate) fn collect_example_values(non_null: &Series, limit: usize) -> PolarsResult<Vec<Value>> {
    let mut examples: Vec<Value> = Vec::with_capacity(limit);

    for idx in 0..non_null.len() {
        if examples.len() >= limit {
            break;
        }
        let value = to_json_value(&non_null.get(idx)?);
        if value.is_null() || examples.contains(&value) {
            continue;
        }
        examples.push(value);
    }

    Ok(examples)
}

/// Convert a polars cell into a JSON primitive.
///
/// Temporal values become ISO-like strings; anything without a natural JSON
/// form falls back to its display string.
pub(crate) fn to_json_value(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String((*s).to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => float_value(f64::from(*v)),
        AnyValue::Float64(v) => float_value(*v),
        AnyValue::Date(days) => format_date(*days)
            .map(Value::String)
            .unwrap_or_else(|| Value::String(value.to_string())),
        AnyValue::Datetime(ts, unit, tz) => {
            format_datetime(*ts, *unit, tz.map(|tz| tz.as_str()))
                .map(Value::String)
                .unwrap_or_else(|| Value::String(value.to_string()))
        }
        other => Value::String(other.to_string()),
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn format_date(days_since_epoch: i32) -> Option<String> {
    NaiveDate::from_num_days_from_ce_opt(days_since_epoch.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Naive columns render as wall-clock time. Zoned columns carry an offset:
/// fixed-offset zones keep their local time, named zones render the UTC instant.
fn format_datetime(ts: i64, unit: TimeUnit, tz: Option<&str>) -> Option<String> {
    let datetime: DateTime<Utc> = match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(ts),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ts)?,
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ts)?,
    };
    let Some(tz) = tz else {
        return Some(datetime.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string());
    };
    let offset = fixed_offset(tz).unwrap_or_else(|| Utc.fix());
    Some(
        datetime
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S%.f%:z")
            .to_string(),
    )
}

fn fixed_offset(tz: &str) -> Option<FixedOffset> {
    match tz {
        "UTC" | "Z" | "Etc/UTC" => Some(Utc.fix()),
        _ => tz.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_conversion() {
        assert_eq!(to_json_value(&AnyValue::Int64(42)), json!(42));
        assert_eq!(to_json_value(&AnyValue::UInt8(7)), json!(7));
        assert_eq!(to_json_value(&AnyValue::Float64(1.5)), json!(1.5));
        assert_eq!(to_json_value(&AnyValue::Boolean(true)), json!(true));
        assert_eq!(to_json_value(&AnyValue::String("paid")), json!("paid"));
        assert_eq!(to_json_value(&AnyValue::Null), Value::Null);
        assert_eq!(to_json_value(&AnyValue::Float64(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_temporal_conversion() {
        // 2024-01-15 is 19737 days after the epoch
        assert_eq!(to_json_value(&AnyValue::Date(19737)), json!("2024-01-15"));
        assert_eq!(
            to_json_value(&AnyValue::Datetime(
                1_705_314_600_000,
                TimeUnit::Milliseconds,
                None
            )),
            json!("2024-01-15 10:30:00")
        );
    }

    #[test]
    fn test_zoned_datetime_keeps_offset() {
        let ts = 1_705_314_600_000;
        assert_eq!(
            format_datetime(ts, TimeUnit::Milliseconds, Some("UTC")).unwrap(),
            "2024-01-15 10:30:00+00:00"
        );
        assert_eq!(
            format_datetime(ts, TimeUnit::Milliseconds, Some("+05:30")).unwrap(),
            "2024-01-15 16:00:00+05:30"
        );
        assert_eq!(
            format_datetime(ts, TimeUnit::Milliseconds, Some("America/New_York")).unwrap(),
            "2024-01-15 10:30:00+00:00"
        );
        assert_eq!(
            format_datetime(ts, TimeUnit::Milliseconds, None).unwrap(),
            "2024-01-15 10:30:00"
        );
    }

    #[test]
    fn test_examples_are_distinct_and_ordered() {
        let series = Series::new("status".into(), &["b", "a", "b", "c", "a", "d", "e", "f"]);
        let examples = collect_example_values(&series, 5).unwrap();
        assert_eq!(examples, vec![json!("b"), json!("a"), json!("c"), json!("d"), json!("e")]);
    }

    #[test]
    fn test_examples_fewer_than_limit() {
        let series = Series::new("flag".into(), &[true, true, false]);
        let examples = collect_example_values(&series, 5).unwrap();
        assert_eq!(examples, vec![json!(true), json!(false)]);
    }
}
