//! Rule frequency over edges.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::InsightsResult;
use crate::record::frequency::sort_and_truncate;

use super::Edge;

/// A single row of a rule frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeFrequencyEntry {
    #[serde(rename = "value")]
    pub rule_id: String,
    pub frequency: usize,
    pub percentage: f64,
}

/// Returns how often each rule links two records.
///
/// Ordering and `top` behave like [`crate::record::frequency_distribution`]: highest frequency
/// first unless `ascending`, ties in first-occurrence order, `Some(0)` yields an empty table.
/// Rule usages implied by duplicates are not considered.
pub fn frequency_distribution<E: AsRef<str>>(
    edges: &[E],
    top: Option<usize>,
    ascending: bool,
) -> InsightsResult<Vec<EdgeFrequencyEntry>> {
    if top == Some(0) {
        return Ok(Vec::new());
    }

    let mut entries: Vec<EdgeFrequencyEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for raw in edges {
        let rule = Edge::parse(raw.as_ref())?.rule;
        match index.get(rule) {
            Some(&i) => entries[i].frequency += 1,
            None => {
                index.insert(rule, entries.len());
                entries.push(EdgeFrequencyEntry {
                    rule_id: rule.to_string(),
                    frequency: 1,
                    percentage: 0.0,
                });
            }
        }
    }

    let total = edges.len() as f64;
    for entry in &mut entries {
        entry.percentage = entry.frequency as f64 / total;
    }
    sort_and_truncate(&mut entries, |e| e.frequency, top, ascending);
    Ok(entries)
}
