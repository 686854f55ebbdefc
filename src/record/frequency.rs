//! Frequency distribution of the values at a record path.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::InsightsResult;
use crate::types::{AsRecord, Value};

use super::extract::to_string;
use super::visit::visit;

/// A single row of a frequency distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyDistributionEntry {
    /// The first occurrence of the value, in its original form.
    pub value: Value,
    /// How often the value occurred.
    pub frequency: usize,
    /// `frequency` divided by the number of non-null values.
    pub percentage: f64,
}

/// Returns how often each non-null value at `path` is present.
///
/// Rows are ordered by frequency, highest first unless `ascending`. Values with equal frequency
/// keep the order of their first occurrence. `top` limits the result to the first `n` rows;
/// `Some(0)` yields an empty table and `None` returns every row.
///
/// Values are compared by their textual form, lowercased unless `case_sensitive`.
pub fn frequency_distribution<R: AsRecord>(
    records: &[R],
    path: &str,
    case_sensitive: bool,
    top: Option<usize>,
    ascending: bool,
) -> InsightsResult<Vec<FrequencyDistributionEntry>> {
    if top == Some(0) {
        return Ok(Vec::new());
    }

    // Entries are created in first-occurrence order, which doubles as the tie-breaker.
    let mut entries: Vec<FrequencyDistributionEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counted = 0usize;

    visit(records, path, |value, _| -> InsightsResult<()> {
        let Some(key) = to_string(value, case_sensitive)? else {
            return Ok(());
        };
        counted += 1;
        match index.get(&key) {
            Some(&i) => entries[i].frequency += 1,
            None => {
                index.insert(key, entries.len());
                entries.push(FrequencyDistributionEntry {
                    value: value.cloned().unwrap_or(Value::Null),
                    frequency: 1,
                    percentage: 0.0,
                });
            }
        }
        Ok(())
    })?;

    let total = counted as f64;
    for entry in &mut entries {
        entry.percentage = entry.frequency as f64 / total;
    }
    sort_and_truncate(&mut entries, |e| e.frequency, top, ascending);
    Ok(entries)
}

/// Stable sort by frequency (descending unless `ascending`), then truncate to `top`.
pub(crate) fn sort_and_truncate<T>(
    entries: &mut Vec<T>,
    frequency: impl Fn(&T) -> usize,
    top: Option<usize>,
    ascending: bool,
) {
    if ascending {
        entries.sort_by_key(|e| frequency(e));
    } else {
        entries.sort_by_key(|e| std::cmp::Reverse(frequency(e)));
    }
    if let Some(n) = top {
        entries.truncate(n);
    }
}
