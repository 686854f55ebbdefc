//! Utilities over edges and duplicates, the relationship data linking records.
//!
//! An edge is a string `recordA:recordB:ruleID`; the rule id may itself contain `:`. Duplicates
//! map a record id, optionally prefixed with a rule group (`G1:record-1`), to the ids it
//! duplicates.

pub mod frequency;
pub mod matrix;

pub use frequency::{frequency_distribution, EdgeFrequencyEntry};
pub use matrix::{matrix, MatrixEntry};

use crate::error::{InsightsError, InsightsResult};

/// A parsed edge with its two record ids in lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<'a> {
    pub a: &'a str,
    pub b: &'a str,
    pub rule: &'a str,
}

impl<'a> Edge<'a> {
    /// Parses `recordA:recordB:ruleID`, swapping the ids if needed so that `a <= b`.
    pub fn parse(raw: &'a str) -> InsightsResult<Self> {
        let mut parts = raw.splitn(3, ':');
        let (Some(first), Some(second), Some(rule)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(InsightsError::MalformedEdge {
                edge: raw.to_string(),
            });
        };
        let (a, b) = if second < first { (second, first) } else { (first, second) };
        Ok(Self { a, b, rule })
    }
}

/// Number of edges. Links implied by duplicates are not counted.
pub fn count<E: AsRef<str>>(edges: &[E]) -> usize {
    edges.len()
}
