//! Numeric reductions over a record path.
//!
//! Every reduction ignores missing/null values and returns `None` (not zero) when no value was
//! seen. Strings holding numbers are accepted; any other non-null value aborts with an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::InsightsResult;
use crate::types::AsRecord;

use super::visit::{visit_number, visit_string};

/// Built-in reductions over a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReduceOp {
    /// Count all records (including null records). Ignores the path.
    Count,
    /// Sum of values.
    Sum,
    /// Arithmetic mean.
    Average,
    /// Middle value (mean of the two middle values for even counts).
    Median,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// Population standard deviation.
    StandardDeviation,
}

/// Reduce `path` across `records` with a built-in [`ReduceOp`].
pub fn reduce<R: AsRecord>(records: &[R], path: &str, op: ReduceOp) -> InsightsResult<Option<f64>> {
    match op {
        ReduceOp::Count => Ok(Some(count(records) as f64)),
        ReduceOp::Sum => sum(records, path),
        ReduceOp::Average => average(records, path),
        ReduceOp::Median => median(records, path),
        ReduceOp::Min => min(records, path),
        ReduceOp::Max => max(records, path),
        ReduceOp::StandardDeviation => standard_deviation(records, path),
    }
}

/// Number of entries in `records`. Null records count like any other entry.
pub fn count<R>(records: &[R]) -> usize {
    records.len()
}

/// Sum of all numeric values at `path`.
pub fn sum<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let mut total = 0.0;
    let counted = for_each_number(records, path, |n| total += n)?;
    Ok((counted > 0).then_some(total))
}

/// Mean of all numeric values at `path`.
pub fn average<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let mut total = 0.0;
    let counted = for_each_number(records, path, |n| total += n)?;
    Ok((counted > 0).then(|| total / counted as f64))
}

/// Median of all numeric values at `path`.
pub fn median<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let mut numbers = Vec::new();
    for_each_number(records, path, |n| numbers.push(n))?;
    if numbers.is_empty() {
        return Ok(None);
    }
    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 1 {
        Ok(Some(numbers[mid]))
    } else {
        Ok(Some((numbers[mid - 1] + numbers[mid]) / 2.0))
    }
}

/// Smallest numeric value at `path`.
pub fn min<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let mut acc: Option<f64> = None;
    for_each_number(records, path, |n| acc = Some(acc.map_or(n, |a| a.min(n))))?;
    Ok(acc)
}

/// Largest numeric value at `path`.
pub fn max<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let mut acc: Option<f64> = None;
    for_each_number(records, path, |n| acc = Some(acc.map_or(n, |a| a.max(n))))?;
    Ok(acc)
}

/// Population standard deviation of the numeric values at `path`.
///
/// Two passes: the mean first, then the sum of squared deviations.
pub fn standard_deviation<R: AsRecord>(records: &[R], path: &str) -> InsightsResult<Option<f64>> {
    let Some(mean) = average(records, path)? else {
        return Ok(None);
    };
    let mut squares = 0.0;
    let counted = for_each_number(records, path, |n| {
        let diff = n - mean;
        squares += diff * diff;
    })?;
    Ok((counted > 0).then(|| (squares / counted as f64).sqrt()))
}

/// Probability of having the one correct value at `path`.
///
/// For the values `["a", "a", "a", "b"]` this is `0.75 * 0.75 + 0.25 * 0.25 = 0.625`. Values are
/// compared by their textual form, lowercased unless `case_sensitive`.
pub fn confidence<R: AsRecord>(
    records: &[R],
    path: &str,
    case_sensitive: bool,
) -> InsightsResult<Option<f64>> {
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    let mut counted = 0usize;
    visit_string(records, path, case_sensitive, |value, _| {
        if let Some(value) = value {
            counted += 1;
            *frequencies.entry(value).or_default() += 1;
        }
        Ok(())
    })?;
    if counted == 0 {
        return Ok(None);
    }
    let total = counted as f64;
    let weighted: f64 = frequencies
        .values()
        .map(|&f| (f as f64 / total) * f as f64)
        .sum();
    Ok(Some(weighted / total))
}

fn for_each_number<R: AsRecord>(
    records: &[R],
    path: &str,
    mut f: impl FnMut(f64),
) -> InsightsResult<usize> {
    let mut counted = 0usize;
    visit_number(records, path, |n, _| {
        if let Some(n) = n {
            counted += 1;
            f(n);
        }
        Ok(())
    })?;
    Ok(counted)
}
