//! Conversions between attribute values and field values.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::error::Error;
use crate::field::Attribute;
use crate::types::{json_type_name, TimeFormat};

/// Accepted layout when reading `iso8601` times; fractional seconds are
/// tolerated on input.
const ISO8601_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Error for a value of the wrong JSON type.
///
/// A number sent to a field that is not numeric gets its own error.
pub(crate) fn mismatch(attr: &Attribute<'_>, expected: &'static str) -> Error {
    match attr.value {
        Value::Number(_) => Error::UnknownFieldNumberType {
            attribute: attr.name.to_string(),
        },
        other => invalid_type(attr, expected, other),
    }
}

fn invalid_type(attr: &Attribute<'_>, expected: &'static str, value: &Value) -> Error {
    Error::InvalidType {
        attribute: attr.name.to_string(),
        expected,
        actual: json_type_name(value),
    }
}

fn invalid_time(attr: &Attribute<'_>) -> Error {
    Error::InvalidTime {
        attribute: attr.name.to_string(),
        format: attr.format,
    }
}

/// Integral value of a number. Floats with a fractional part are refused.
fn integral(number: &Number) -> Option<i128> {
    if let Some(value) = number.as_i64() {
        return Some(value.into());
    }
    if let Some(value) = number.as_u64() {
        return Some(value.into());
    }
    let value = number.as_f64()?;
    if value.fract() != 0.0 || !value.is_finite() || value.abs() >= 1e38 {
        return None;
    }
    Some(value as i128)
}

/// Decode an integer attribute; `Ok(None)` for null.
pub(crate) fn integer<T: TryFrom<i128>>(
    attr: &Attribute<'_>,
    expected: &'static str,
) -> Result<Option<T>, Error> {
    match attr.value {
        Value::Null => Ok(None),
        Value::Number(number) => integral(number)
            .and_then(|value| T::try_from(value).ok())
            .map(Some)
            .ok_or_else(|| invalid_type(attr, expected, attr.value)),
        other => Err(invalid_type(attr, expected, other)),
    }
}

pub(crate) fn float(attr: &Attribute<'_>, expected: &'static str) -> Result<Option<f64>, Error> {
    match attr.value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid_type(attr, expected, attr.value)),
        other => Err(invalid_type(attr, expected, other)),
    }
}

pub(crate) fn boolean(attr: &Attribute<'_>) -> Result<Option<bool>, Error> {
    match attr.value {
        Value::Null => Ok(None),
        Value::Bool(value) => Ok(Some(*value)),
        _ => Err(mismatch(attr, "bool")),
    }
}

pub(crate) fn string(attr: &Attribute<'_>) -> Result<Option<String>, Error> {
    match attr.value {
        Value::Null => Ok(None),
        Value::String(value) => Ok(Some(value.clone())),
        _ => Err(mismatch(attr, "string")),
    }
}

/// Decode a time attribute according to its encoding.
pub(crate) fn time(attr: &Attribute<'_>) -> Result<Option<DateTime<Utc>>, Error> {
    if attr.value.is_null() {
        return Ok(None);
    }
    let parsed = match (attr.format, attr.value) {
        (TimeFormat::Epoch, Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        (TimeFormat::Iso8601, Value::String(text)) => {
            NaiveDateTime::parse_from_str(text, ISO8601_INPUT_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        }
        (TimeFormat::Rfc3339, Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| invalid_time(attr))
}

/// Render a time in the given encoding.
pub(crate) fn render_time(time: &DateTime<Utc>, format: TimeFormat) -> Value {
    match format {
        TimeFormat::Epoch => Value::from(time.timestamp()),
        TimeFormat::Iso8601 => Value::String(time.format(crate::types::ISO8601_FORMAT).to_string()),
        TimeFormat::Rfc3339 => Value::String(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Render a float; non-finite values have no JSON form and become null.
pub(crate) fn render_float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// The zero time: the Unix epoch.
pub(crate) fn is_zero_time(time: &DateTime<Utc>) -> bool {
    *time == DateTime::<Utc>::default()
}
