//! Path visitation over record lists.
//!
//! A path is a list of object keys or array indices joined by `.`, e.g. `foo.bar.0.a`. An array
//! segment may be the wildcard `*`, which visits every element of that array and is the only way
//! a single record yields more than one value.
//!
//! The visitor is invoked once per resolved value. Unresolvable paths (missing keys, out of
//! range or non-numeric indices, descending into a scalar) and present JSON `null`s are reported
//! as `None`. A null record is reported exactly once, as `(None, None)`.

use crate::error::InsightsResult;
use crate::types::{AsRecord, Record, Timestamp, Value};

use super::extract::{present, to_array, to_number, to_string, to_time};

const WILDCARD: &str = "*";

/// Visit every value of every record at `path`.
///
/// The first error returned by `visitor` aborts the traversal and is returned as-is; no further
/// elements or records are visited.
pub fn visit<'a, R, E, F>(records: &'a [R], path: &str, mut visitor: F) -> Result<(), E>
where
    R: AsRecord,
    F: FnMut(Option<&'a Value>, Option<&'a Record>) -> Result<(), E>,
{
    let segments: Vec<&str> = path.split('.').collect();
    for item in records {
        match item.as_record() {
            Some(record) => visit_object(&record.data, &segments, record, &mut visitor)?,
            None => visitor(None, None)?,
        }
    }
    Ok(())
}

fn visit_object<'a, E, F>(
    data: &'a serde_json::Map<String, Value>,
    segments: &[&str],
    record: &'a Record,
    visitor: &mut F,
) -> Result<(), E>
where
    F: FnMut(Option<&'a Value>, Option<&'a Record>) -> Result<(), E>,
{
    // `str::split` always yields at least one segment.
    let Some((segment, rest)) = segments.split_first() else {
        return visitor(None, Some(record));
    };
    match data.get(*segment) {
        Some(value) => visit_value(value, rest, record, visitor),
        None => visitor(None, Some(record)),
    }
}

fn visit_value<'a, E, F>(
    node: &'a Value,
    segments: &[&str],
    record: &'a Record,
    visitor: &mut F,
) -> Result<(), E>
where
    F: FnMut(Option<&'a Value>, Option<&'a Record>) -> Result<(), E>,
{
    let Some((segment, rest)) = segments.split_first() else {
        return visitor(present(node), Some(record));
    };
    match node {
        Value::Object(map) => visit_object(map, segments, record, visitor),
        Value::Array(items) if *segment == WILDCARD => {
            for item in items {
                visit_value(item, rest, record, visitor)?;
            }
            Ok(())
        }
        Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
            Some(item) => visit_value(item, rest, record, visitor),
            None => visitor(None, Some(record)),
        },
        _ => visitor(None, Some(record)),
    }
}

/// Typed variant of [`visit`] yielding numbers.
///
/// Non-numeric values (other than numeric strings) abort with an error.
pub fn visit_number<'a, R, F>(records: &'a [R], path: &str, mut visitor: F) -> InsightsResult<()>
where
    R: AsRecord,
    F: FnMut(Option<f64>, Option<&'a Record>) -> InsightsResult<()>,
{
    visit(records, path, |value, record| visitor(to_number(value, path)?, record))
}

/// Typed variant of [`visit`] yielding the textual form of each value.
pub fn visit_string<'a, R, F>(
    records: &'a [R],
    path: &str,
    case_sensitive: bool,
    mut visitor: F,
) -> InsightsResult<()>
where
    R: AsRecord,
    F: FnMut(Option<String>, Option<&'a Record>) -> InsightsResult<()>,
{
    visit(records, path, |value, record| {
        visitor(to_string(value, case_sensitive)?, record)
    })
}

/// Typed variant of [`visit`] yielding timestamps.
pub fn visit_time<'a, R, F>(records: &'a [R], path: &str, mut visitor: F) -> InsightsResult<()>
where
    R: AsRecord,
    F: FnMut(Option<Timestamp>, Option<&'a Record>) -> InsightsResult<()>,
{
    visit(records, path, |value, record| visitor(to_time(value)?, record))
}

/// Typed variant of [`visit`] yielding arrays.
pub fn visit_array<'a, R, F>(records: &'a [R], path: &str, mut visitor: F) -> InsightsResult<()>
where
    R: AsRecord,
    F: FnMut(Option<&'a [Value]>, Option<&'a Record>) -> InsightsResult<()>,
{
    visit(records, path, |value, record| visitor(to_array(value, path)?, record))
}
