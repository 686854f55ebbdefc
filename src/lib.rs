//! `record-insights` computes analytics over lists of loosely-typed records: nested JSON documents
//! addressed by dotted paths such as `user.addresses.*.city`.
//!
//! Every record operation takes a slice of [`types::AsRecord`] items, so owned records,
//! references, shared pointers and null entries (`Option::<Record>::None`) are all accepted.
//! Operations are pure: they never mutate the input, and operations returning records hand back
//! references into it.
//!
//! ## Path semantics
//!
//! - `a.b.c` walks nested objects; a numeric segment indexes into an array (`items.0.name`)
//! - `*` visits every element of an array (`items.*.price`)
//! - a missing key, an out-of-range index or an explicit `null` all mean "no value"
//!
//! Numbers may be stored as JSON numbers or numeric strings. Times are RFC 3339 strings (or naive
//! `YYYY-MM-DDTHH:MM:SS` timestamps, read as UTC). Anything else at a numeric or temporal path is
//! an [`InsightsError`].
//!
//! ## Quick example
//!
//! ```rust
//! use record_insights::record::{count_distinct, frequency_distribution, median};
//! use record_insights::types::Record;
//! use serde_json::json;
//!
//! let records = vec![
//!     Some(Record::from_value("r1", json!({"city": "Oslo", "orders": [{"total": 10}, {"total": 30}]}))),
//!     None,
//!     Some(Record::from_value("r2", json!({"city": "oslo", "orders": [{"total": "20"}]}))),
//! ];
//!
//! assert_eq!(median(&records, "orders.*.total").unwrap(), Some(20.0));
//! assert_eq!(count_distinct(&records, &["city"], false).unwrap(), 1);
//!
//! let table = frequency_distribution(&records, "city", true, None, false).unwrap();
//! assert_eq!(table.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`record`]: path visitation, extraction, reductions, filter/sort/group and selection
//! - [`edge`]: rule counts and the pairwise link matrix over `recordA:recordB:ruleID` edges
//! - [`ingestion`]: loading records (JSON, NDJSON, CSV) and relations (JSON) from files
//! - [`execution`]: serde-friendly requests evaluated by an observable [`execution::InsightEngine`]
//! - [`types`]: the record model
//! - [`error`]: the error type shared by everything above

pub mod edge;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod record;
pub mod types;

pub use error::{InsightsError, InsightsResult};
