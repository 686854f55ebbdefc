//! Multi-key stable sorting.
//!
//! Sorting runs in two phases. The probe phase extracts every key once and decides per key
//! whether it compares numerically ([`KeyKind::Numeric`], only if every record's value at that
//! path is a number or missing) or textually. The comparison phase then permutes indices into the
//! input slice, so records are never moved or cloned.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::InsightsResult;
use crate::types::AsRecord;

use super::extract::{extract_number, extract_string};

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriteria {
    pub path: String,
    #[serde(default, alias = "asc")]
    pub ascending: bool,
}

impl SortCriteria {
    pub fn asc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ascending: true,
        }
    }

    pub fn desc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ascending: false,
        }
    }
}

/// How the values of one sort key are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Numeric,
    Text,
}

/// Extracted values of one key, indexed like the input records.
enum SortKey {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl SortKey {
    fn kind(&self) -> KeyKind {
        match self {
            SortKey::Numeric(_) => KeyKind::Numeric,
            SortKey::Text(_) => KeyKind::Text,
        }
    }

    fn compare(&self, a: usize, b: usize, ascending: bool) -> Ordering {
        match self {
            SortKey::Numeric(values) => compare_nullable(&values[a], &values[b], ascending, |x, y| {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }),
            SortKey::Text(values) => {
                compare_nullable(&values[a], &values[b], ascending, |x, y| x.cmp(y))
            }
        }
    }
}

/// Returns the records ordered by `criteria`.
///
/// Earlier criteria take precedence; records equal on every key keep their input order. Missing
/// values sort last in ascending and first in descending order. Text keys compare the lowercased
/// textual form.
pub fn sort<'a, R: AsRecord>(records: &'a [R], criteria: &[SortCriteria]) -> InsightsResult<Vec<&'a R>> {
    let keys = probe(records, criteria)?;

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        keys.iter()
            .zip(criteria)
            .map(|(key, c)| key.compare(a, b, c.ascending))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    Ok(order.into_iter().map(|i| &records[i]).collect())
}

/// Decides the [`KeyKind`] of every criterion for `records`.
pub fn key_kinds<R: AsRecord>(records: &[R], criteria: &[SortCriteria]) -> InsightsResult<Vec<KeyKind>> {
    Ok(probe(records, criteria)?.iter().map(SortKey::kind).collect())
}

fn probe<R: AsRecord>(records: &[R], criteria: &[SortCriteria]) -> InsightsResult<Vec<SortKey>> {
    criteria
        .iter()
        .map(|c| {
            let texts = records
                .iter()
                .map(|r| extract_string(r, &c.path, false))
                .collect::<InsightsResult<Vec<_>>>()?;
            let numbers = records
                .iter()
                .map(|r| extract_number(r, &c.path))
                .collect::<InsightsResult<Vec<_>>>();
            Ok(match numbers {
                Ok(numbers) => SortKey::Numeric(numbers),
                Err(_) => SortKey::Text(texts),
            })
        })
        .collect()
}

fn compare_nullable<T>(
    a: &Option<T>,
    b: &Option<T>,
    ascending: bool,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) if ascending => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) if ascending => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) if ascending => cmp(x, y),
        (Some(x), Some(y)) => cmp(y, x),
    }
}
