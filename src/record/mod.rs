//! Analytics over record lists.
//!
//! Every function here takes a slice of [`crate::types::AsRecord`] items and a dotted path
//! (`nested.list.0.value`, with `*` as an array wildcard). Functions are pure: they never mutate
//! their input, and record-list results borrow from it.
//!
//! - [`visit()`] and the typed visitors: the path walk everything else is built on
//! - [`extract()`] and the typed extractors: single-record lookup
//! - [`reduce()`]: count/sum/average/median/min/max/standard deviation, plus [`confidence()`]
//! - [`count_distinct()`], [`frequency_distribution()`]
//! - [`flatten()`], [`flatten_distinct()`], [`values()`], [`values_distinct()`]
//! - [`first()`], [`last()`], [`newest()`], [`oldest()`], [`limit()`]
//! - [`filter()`], [`sort()`], [`group()`]
//!
//! ## Example: filter → sort → reduce
//!
//! ```rust
//! use record_insights::record::{filter, reduce, sort, FilterCondition, ReduceOp, SortCriteria};
//! use record_insights::types::Record;
//! use serde_json::json;
//!
//! let records = vec![
//!     Record::from_value("r1", json!({"user": {"name": "Ann"}, "score": 10})),
//!     Record::from_value("r2", json!({"user": {"name": "bob"}, "score": "20"})),
//!     Record::from_value("r3", json!({"user": {"name": "Anna"}, "score": null})),
//! ];
//!
//! let ann = filter(&records, &[FilterCondition::new("user.name").starts_with("ann")]).unwrap();
//! assert_eq!(ann.len(), 2);
//!
//! let sorted = sort(&records, &[SortCriteria::desc("score")]).unwrap();
//! assert_eq!(sorted[0].id, "r3");
//! assert_eq!(sorted[1].id, "r2");
//!
//! // Nulls are ignored, numeric strings are parsed.
//! let sum = reduce(&records, "score", ReduceOp::Sum).unwrap();
//! assert_eq!(sum, Some(30.0));
//! ```

pub mod collect;
pub mod distinct;
pub mod extract;
pub mod filter;
pub mod frequency;
pub mod group;
pub mod reduce;
pub mod select;
pub mod sort;
pub mod visit;

pub use collect::{flatten, flatten_distinct, values, values_distinct};
pub use distinct::count_distinct;
pub use extract::{
    extract, extract_array, extract_number, extract_string, extract_time, parse_time,
    value_to_string,
};
pub use filter::{filter, FilterCondition};
pub use frequency::{frequency_distribution, FrequencyDistributionEntry};
pub use group::group;
pub use reduce::{
    average, confidence, count, max, median, min, reduce, standard_deviation, sum, ReduceOp,
};
pub use select::{first, last, limit, newest, oldest};
pub use sort::{key_kinds, sort, KeyKind, SortCriteria};
pub use visit::{visit, visit_array, visit_number, visit_string, visit_time};
