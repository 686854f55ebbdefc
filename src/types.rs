//! Core data model types.
//!
//! A [`Record`] is an identifier plus a nested JSON document. Every analytics function accepts a
//! slice of anything implementing [`AsRecord`], which is how a *null record* is expressed: an
//! element whose [`AsRecord::as_record`] returns `None` (e.g. `Option::<Record>::None`).

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use serde_json::{Map, Value};

/// Parsed timestamp as produced by the time extractors.
pub type Timestamp = DateTime<FixedOffset>;

/// Duplicate links: a (possibly `group:`-prefixed) record id mapped to the ids it duplicates.
pub type Duplicates = HashMap<String, Vec<String>>;

/// A single record: an opaque identifier plus its document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier.
    pub id: String,
    /// Nested document. Keys are unique; lookup does not depend on insertion order.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Record {
    /// Create a record from an id and a document.
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Create a record from an id and a JSON value.
    ///
    /// Non-object values produce a record with an empty document.
    pub fn from_value(id: impl Into<String>, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, data)
    }
}

/// Relationship data between records: edges (`recordA:recordB:ruleID`) and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relations {
    pub edges: Vec<String>,
    pub duplicates: Duplicates,
}

/// Access to an optional [`Record`].
///
/// This is the seam that lets the analytics functions operate on owned records, references,
/// shared pointers and nullable entries alike. `None` marks a null record, which every consumer
/// treats as an empty input rather than an error.
pub trait AsRecord {
    /// Returns the record, or `None` for a null entry.
    fn as_record(&self) -> Option<&Record>;
}

impl AsRecord for Record {
    fn as_record(&self) -> Option<&Record> {
        Some(self)
    }
}

impl<T: AsRecord> AsRecord for Option<T> {
    fn as_record(&self) -> Option<&Record> {
        self.as_ref().and_then(AsRecord::as_record)
    }
}

impl<T: AsRecord + ?Sized> AsRecord for &T {
    fn as_record(&self) -> Option<&Record> {
        (**self).as_record()
    }
}

impl<T: AsRecord + ?Sized> AsRecord for Box<T> {
    fn as_record(&self) -> Option<&Record> {
        (**self).as_record()
    }
}

impl<T: AsRecord + ?Sized> AsRecord for Rc<T> {
    fn as_record(&self) -> Option<&Record> {
        (**self).as_record()
    }
}

impl<T: AsRecord + ?Sized> AsRecord for Arc<T> {
    fn as_record(&self) -> Option<&Record> {
        (**self).as_record()
    }
}
