use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::kind::{ParamType, TypeSpec};
use crate::value::{format_date, format_number, Pattern, Value};

/// Coerce `value` into the declared shape. `Null` always stays `Null`;
/// untyped params keep whatever they are given.
pub fn coerce(value: Value, spec: Option<&TypeSpec>) -> Value {
    let Some(spec) = spec else {
        return value;
    };
    if value.is_null() {
        return value;
    }

    match spec {
        TypeSpec::ArrayOf(element) => match value {
            Value::String(text) => Value::Array(
                text.split(',')
                    .map(|part| coerce_element(Value::String(part.to_string()), element))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| coerce_element(item, element))
                    .collect(),
            ),
            other => Value::Array(vec![coerce_element(other, element)]),
        },
        TypeSpec::Scalar(element) => match value {
            Value::Array(items) if !passes_arrays(element) => Value::Array(
                items
                    .into_iter()
                    .map(|item| coerce_element(item, element))
                    .collect(),
            ),
            other => coerce_element(other, element),
        },
    }
}

fn passes_arrays(element: &ParamType) -> bool {
    matches!(element, ParamType::Object | ParamType::Custom(_))
}

fn coerce_element(value: Value, element: &ParamType) -> Value {
    if value.is_null() {
        return value;
    }
    match element {
        ParamType::String => to_string(value),
        ParamType::Number => to_number(value),
        ParamType::Boolean => to_boolean(value),
        ParamType::Date => to_date(value),
        ParamType::RegExp => to_pattern(value),
        ParamType::Object => value,
        ParamType::Custom(custom) => custom.coerce(value),
    }
}

fn to_string(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        Value::Number(n) => Value::String(format_number(n)),
        Value::Date(d) => Value::String(format_date(&d)),
        Value::RegExp(p) => Value::String(p.source().to_string()),
        other => Value::String(other.to_string()),
    }
}

fn to_number(value: Value) -> Value {
    match value {
        Value::Number(_) => value,
        Value::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        Value::Date(d) => Value::Number(d.timestamp_millis() as f64),
        Value::String(text) => parse_number(&text).map_or(Value::Null, Value::Number),
        _ => Value::Null,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn to_boolean(value: Value) -> Value {
    match value {
        Value::Bool(_) => value,
        Value::String(text) => {
            let text = text.trim();
            Value::Bool(!(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false")))
        }
        other => Value::Bool(other.is_truthy()),
    }
}

fn to_date(value: Value) -> Value {
    match value {
        Value::Date(_) => value,
        Value::Number(n) => {
            DateTime::from_timestamp_millis(n as i64).map_or(Value::Null, Value::Date)
        }
        Value::String(text) => parse_date(&text).map_or(Value::Null, Value::Date),
        _ => Value::Null,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC), `YYYY-MM-DD`, a bare
/// four-digit year, or epoch milliseconds.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        let year = text.parse::<i32>().ok()?;
        return Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    }
    text.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

fn to_pattern(value: Value) -> Value {
    let source = match value {
        Value::RegExp(_) => return value,
        Value::String(text) => text,
        other => other.to_string(),
    };
    match Pattern::new(&source) {
        Ok(pattern) => Value::RegExp(pattern),
        Err(err) => {
            debug!(error = %err, "dropping value that is not a valid pattern");
            Value::Null
        }
    }
}
