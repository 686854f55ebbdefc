//! Typed insight requests and their results.

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

use crate::edge::{EdgeFrequencyEntry, MatrixEntry};
use crate::record::{FilterCondition, FrequencyDistributionEntry, SortCriteria};
use crate::types::{AsRecord, Record, Value};

/// An operation over a record list, as a host would request it.
///
/// Deserializes from camelCase JSON tagged by `op`, e.g.
/// `{"op": "frequencyDistribution", "path": "city", "top": 3}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Insight {
    Count,
    CountDistinct {
        paths: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    Sum {
        path: String,
    },
    Average {
        path: String,
    },
    Median {
        path: String,
    },
    Min {
        path: String,
    },
    Max {
        path: String,
    },
    StandardDeviation {
        path: String,
    },
    Confidence {
        path: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    FrequencyDistribution {
        path: String,
        #[serde(default)]
        case_sensitive: bool,
        /// Negative means unlimited.
        #[serde(default = "unlimited")]
        top: i64,
        #[serde(default)]
        ascending: bool,
    },
    Flatten {
        path: String,
    },
    FlattenDistinct {
        path: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    Values {
        path: String,
    },
    ValuesDistinct {
        path: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    First,
    Last,
    Newest {
        path: String,
    },
    Oldest {
        path: String,
    },
    Limit {
        count: i64,
        #[serde(default)]
        offset: i64,
    },
    Filter {
        conditions: Vec<FilterCondition>,
    },
    Sort {
        criteria: Vec<SortCriteria>,
    },
    Group {
        #[serde(default)]
        paths: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
}

impl Insight {
    /// The `op` tag of this insight.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::CountDistinct { .. } => "countDistinct",
            Self::Sum { .. } => "sum",
            Self::Average { .. } => "average",
            Self::Median { .. } => "median",
            Self::Min { .. } => "min",
            Self::Max { .. } => "max",
            Self::StandardDeviation { .. } => "standardDeviation",
            Self::Confidence { .. } => "confidence",
            Self::FrequencyDistribution { .. } => "frequencyDistribution",
            Self::Flatten { .. } => "flatten",
            Self::FlattenDistinct { .. } => "flattenDistinct",
            Self::Values { .. } => "values",
            Self::ValuesDistinct { .. } => "valuesDistinct",
            Self::First => "first",
            Self::Last => "last",
            Self::Newest { .. } => "newest",
            Self::Oldest { .. } => "oldest",
            Self::Limit { .. } => "limit",
            Self::Filter { .. } => "filter",
            Self::Sort { .. } => "sort",
            Self::Group { .. } => "group",
        }
    }
}

/// An operation over edges and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EdgeInsight {
    Count,
    FrequencyDistribution {
        #[serde(default = "unlimited")]
        top: i64,
        #[serde(default)]
        ascending: bool,
    },
    Matrix {
        /// `None` requests every link present in the input.
        #[serde(default)]
        links: Option<Vec<String>>,
    },
}

impl EdgeInsight {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Count => "edgeCount",
            Self::FrequencyDistribution { .. } => "edgeFrequencyDistribution",
            Self::Matrix { .. } => "matrix",
        }
    }
}

fn unlimited() -> i64 {
    -1
}

/// Maps a signed `top` onto a row limit; negative values mean unlimited.
pub(crate) fn top_limit(top: i64) -> Option<usize> {
    usize::try_from(top).ok()
}

/// Result of an [`Insight`]. Record results borrow from the evaluated input.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightValue<'a, R> {
    Count(usize),
    /// A reduction; `None` when no value was present.
    Number(Option<f64>),
    Frequencies(Vec<FrequencyDistributionEntry>),
    Values(Vec<Value>),
    Record(Option<&'a Record>),
    Records(Vec<&'a R>),
    Groups(Vec<Vec<&'a R>>),
}

impl<R: AsRecord> Serialize for InsightValue<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => n.serialize(serializer),
            Self::Number(n) => n.serialize(serializer),
            Self::Frequencies(entries) => entries.serialize(serializer),
            Self::Values(values) => values.serialize(serializer),
            Self::Record(record) => record.serialize(serializer),
            Self::Records(records) => serializer.collect_seq(records.iter().map(|r| r.as_record())),
            Self::Groups(groups) => serializer.collect_seq(
                groups
                    .iter()
                    .map(|g| g.iter().map(|r| r.as_record()).collect::<Vec<_>>()),
            ),
        }
    }
}

/// Result of an [`EdgeInsight`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum EdgeInsightValue {
    Count(usize),
    Frequencies(Vec<EdgeFrequencyEntry>),
    Matrix(Vec<MatrixEntry>),
}
