//! Collecting values across records: flatten and values, plus their distinct variants.

use std::collections::HashSet;
use std::convert::Infallible;

use crate::error::InsightsResult;
use crate::types::{AsRecord, Value};

use super::extract::{present, value_to_string};
use super::visit::{visit, visit_array};

/// Concatenates the arrays at `path` of all records, skipping null elements.
///
/// Non-array values abort with an error.
pub fn flatten<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Vec<Value>> {
    let mut out = Vec::new();
    visit_array(records, path, |items, _| {
        out.extend(items.unwrap_or_default().iter().filter_map(present).cloned());
        Ok(())
    })?;
    Ok(out)
}

/// Like [`flatten`], keeping only the first occurrence of each value.
///
/// Values are compared by their textual form, lowercased unless `case_sensitive`.
pub fn flatten_distinct<R: AsRecord>(
    records: &[R],
    path: &str,
    case_sensitive: bool,
) -> InsightsResult<Vec<Value>> {
    let mut unique = Distinct::new(case_sensitive);
    visit_array(records, path, |items, _| {
        for item in items.unwrap_or_default().iter().filter_map(present) {
            unique.offer(item)?;
        }
        Ok(())
    })?;
    Ok(unique.into_values())
}

/// Returns every non-null value at `path`, in visiting order.
pub fn values<R: AsRecord>(records: &[R], path: &str) -> Vec<Value> {
    let mut out = Vec::with_capacity(records.len());
    let visited = visit(records, path, |value, _| -> Result<(), Infallible> {
        out.extend(value.cloned());
        Ok(())
    });
    match visited {
        Ok(()) => out,
        Err(never) => match never {},
    }
}

/// Like [`values`], keeping only the first occurrence of each value.
///
/// Values are compared by their textual form, lowercased unless `case_sensitive`.
pub fn values_distinct<R: AsRecord>(
    records: &[R],
    path: &str,
    case_sensitive: bool,
) -> InsightsResult<Vec<Value>> {
    let mut unique = Distinct::new(case_sensitive);
    visit(records, path, |value, _| -> InsightsResult<()> {
        if let Some(value) = value {
            unique.offer(value)?;
        }
        Ok(())
    })?;
    Ok(unique.into_values())
}

struct Distinct {
    case_sensitive: bool,
    seen: HashSet<String>,
    values: Vec<Value>,
}

impl Distinct {
    fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            seen: HashSet::new(),
            values: Vec::new(),
        }
    }

    fn offer(&mut self, value: &Value) -> InsightsResult<()> {
        if self.seen.insert(value_to_string(value, self.case_sensitive)?) {
            self.values.push(value.clone());
        }
        Ok(())
    }

    fn into_values(self) -> Vec<Value> {
        self.values
    }
}
