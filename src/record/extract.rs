//! Single-record extraction and the typed conversions shared with the visitor.
//!
//! Resolution never fails: a missing key, an out-of-range index, a null record or a present
//! JSON `null` all resolve to `None`. Only the typed conversions can fail, when a non-null
//! value of the wrong type (or an unparsable string) is found.

use chrono::{DateTime, NaiveDateTime};

use crate::error::{InsightsError, InsightsResult};
use crate::types::{AsRecord, Timestamp, Value};

/// Accepted layouts for naive timestamps, tried after RFC 3339.
const NAIVE_TIME_FORMATS: [&str; 1] = ["%Y-%m-%dT%H:%M:%S%.f"];

/// Returns the value of `record` at `path`, or `None` if the path does not resolve.
///
/// Unlike [`super::visit`], this resolves at most one value: a `*` segment is treated like any
/// other non-numeric array segment and resolves to `None`.
pub fn extract<'a, R: AsRecord + ?Sized>(record: &'a R, path: &str) -> Option<&'a Value> {
    let record = record.as_record()?;
    let mut segments = path.split('.');
    let mut current = record.data.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    present(current)
}

/// Extract a number. Numeric strings (including exponent notation) are parsed.
pub fn extract_number<R: AsRecord + ?Sized>(record: &R, path: &str) -> InsightsResult<Option<f64>> {
    to_number(extract(record, path), path)
}

/// Extract the textual form of a value, lowercased unless `case_sensitive`.
///
/// Arrays and objects are rendered as key-sorted JSON.
pub fn extract_string<R: AsRecord + ?Sized>(
    record: &R,
    path: &str,
    case_sensitive: bool,
) -> InsightsResult<Option<String>> {
    to_string(extract(record, path), case_sensitive)
}

/// Extract a timestamp. See [`parse_time`] for the accepted formats.
pub fn extract_time<R: AsRecord + ?Sized>(record: &R, path: &str) -> InsightsResult<Option<Timestamp>> {
    to_time(extract(record, path))
}

/// Extract an array.
pub fn extract_array<'a, R: AsRecord + ?Sized>(
    record: &'a R,
    path: &str,
) -> InsightsResult<Option<&'a [Value]>> {
    to_array(extract(record, path), path)
}

/// Parse a timestamp as RFC 3339 (with optional fractional seconds) or, failing that, as a
/// naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` timestamp interpreted as UTC.
pub fn parse_time(raw: &str) -> InsightsResult<Timestamp> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t);
    }
    for format in NAIVE_TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(t.and_utc().fixed_offset());
        }
    }
    Err(InsightsError::UnparsableTime { raw: raw.to_string() })
}

/// Render any value as text.
///
/// Scalars use their plain form (`true`, `12.5`, `abc`); arrays and objects use key-sorted
/// JSON. The result is lowercased unless `case_sensitive`.
pub fn value_to_string(value: &Value, case_sensitive: bool) -> InsightsResult<String> {
    let text = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value)?,
    };
    Ok(if case_sensitive { text } else { text.to_lowercase() })
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64's Display drops a zero fraction: 1234567.0 renders as "1234567".
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

/// Maps a present JSON `null` onto the missing sentinel.
pub(crate) fn present(value: &Value) -> Option<&Value> {
    if value.is_null() { None } else { Some(value) }
}

pub(crate) fn to_number(value: Option<&Value>, path: &str) -> InsightsResult<Option<f64>> {
    match value {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| type_mismatch(path, "number", value)),
        Some(Value::String(s)) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|source| InsightsError::UnparsableNumber {
                path: path.to_string(),
                raw: s.clone(),
                source,
            }),
        Some(other) => Err(type_mismatch(path, "number", Some(other))),
    }
}

pub(crate) fn to_string(value: Option<&Value>, case_sensitive: bool) -> InsightsResult<Option<String>> {
    value.map(|v| value_to_string(v, case_sensitive)).transpose()
}

pub(crate) fn to_time(value: Option<&Value>) -> InsightsResult<Option<Timestamp>> {
    match to_string(value, true)? {
        Some(raw) => parse_time(&raw).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn to_array<'a>(value: Option<&'a Value>, path: &str) -> InsightsResult<Option<&'a [Value]>> {
    match value {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(other) => Err(type_mismatch(path, "array", Some(other))),
    }
}

fn type_mismatch(path: &str, expected: &'static str, found: Option<&Value>) -> InsightsError {
    InsightsError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.map(type_name).unwrap_or("null"),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Grouping / distinct key built from one string-extracted value per path, in path order.
///
/// Each part is kept separately, so a `None` part never collides with any string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct CompositeKey(Vec<Option<String>>);

impl CompositeKey {
    pub(crate) fn push(&mut self, part: Option<String>) {
        self.0.push(part);
    }

    pub(crate) fn with(&self, part: Option<String>) -> Self {
        let mut next = self.clone();
        next.push(part);
        next
    }

    /// Whether at least one part is non-null.
    pub(crate) fn has_value(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }
}

/// Builds the composite key of `record` over `paths` using single-value extraction.
pub(crate) fn composite_key<R: AsRecord + ?Sized, P: AsRef<str>>(
    record: &R,
    paths: &[P],
    case_sensitive: bool,
) -> InsightsResult<CompositeKey> {
    let mut key = CompositeKey::default();
    for path in paths {
        key.push(extract_string(record, path.as_ref(), case_sensitive)?);
    }
    Ok(key)
}
