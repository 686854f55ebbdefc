//! JSON ingestion implementation.
//!
//! Supported record inputs:
//! - A JSON array of records: `[{"id":"r1","data":{"a":1}}, {"id":"r2","data":{}}]`
//! - A single record object: `{"id":"r1","data":{"a":1}}`
//! - Newline-delimited JSON (NDJSON), one record per line
//!
//! Relations are read from a single object `{"edges": [...], "duplicates": {...}}`.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{InsightsError, InsightsResult};
use crate::types::{Record, Relations};

/// Read records from a JSON or NDJSON file.
pub fn records_from_path(path: impl AsRef<Path>) -> InsightsResult<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    records_from_str(&text)
}

/// Read records from an in-memory JSON or NDJSON string.
pub fn records_from_str(input: &str) -> InsightsResult<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InsightsError::InputMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // A single JSON document first, NDJSON as the fallback.
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| record_from_value(i + 1, item))
            .collect(),
        Ok(item @ Value::Object(_)) => Ok(vec![record_from_value(1, item)?]),
        Ok(_) => Err(InsightsError::InputMismatch {
            message: "json must be a record object, an array of records, or NDJSON".to_string(),
        }),
        Err(_) => ndjson_records(trimmed),
    }
}

fn ndjson_records(input: &str) -> InsightsResult<Vec<Record>> {
    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = serde_json::from_str::<Value>(line).map_err(|e| InsightsError::InputMismatch {
            message: format!("invalid ndjson at line {}: {e}", i + 1),
        })?;
        records.push(record_from_value(i + 1, item)?);
    }
    Ok(records)
}

fn record_from_value(position: usize, item: Value) -> InsightsResult<Record> {
    if !item.is_object() {
        return Err(InsightsError::InputMismatch {
            message: format!("record {position} is not a json object"),
        });
    }
    serde_json::from_value(item).map_err(|e| InsightsError::InputMismatch {
        message: format!("record {position} is invalid: {e}"),
    })
}

/// Read edges and duplicates from a JSON file.
pub fn relations_from_path(path: impl AsRef<Path>) -> InsightsResult<Relations> {
    let text = fs::read_to_string(path)?;
    relations_from_str(&text)
}

/// Read edges and duplicates from an in-memory JSON string. Both parts are optional.
pub fn relations_from_str(input: &str) -> InsightsResult<Relations> {
    Ok(serde_json::from_str(input)?)
}
