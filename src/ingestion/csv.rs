//! CSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{InsightsError, InsightsResult};
use crate::types::Record;

/// Read records from a CSV file.
///
/// Rules:
///
/// - CSV must have headers, and one of them must be `id_column`.
/// - Every other column becomes a string leaf of the record document. Dotted headers
///   (`user.name`) build nested objects.
/// - Empty cells become `null`.
pub fn records_from_path(path: impl AsRef<Path>, id_column: &str) -> InsightsResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    records_from_reader(&mut rdr, id_column)
}

/// Read records from an existing CSV reader.
pub fn records_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    id_column: &str,
) -> InsightsResult<Vec<Record>> {
    let headers = rdr.headers()?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| InsightsError::InputMismatch {
            message: format!(
                "missing id column '{id_column}'. headers={:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        })?;

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let row = result?;

        let id = row.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            return Err(InsightsError::InputMismatch {
                message: format!("row {user_row} has an empty '{id_column}'"),
            });
        }

        let mut data = Map::new();
        for (idx, (header, raw)) in headers.iter().zip(row.iter()).enumerate() {
            if idx == id_idx {
                continue;
            }
            let trimmed = raw.trim();
            let value = if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_owned())
            };
            insert_dotted(&mut data, header, value).map_err(|message| {
                InsightsError::InputMismatch {
                    message: format!("row {user_row}: {message}"),
                }
            })?;
        }
        records.push(Record::new(id, data));
    }
    Ok(records)
}

fn insert_dotted(root: &mut Map<String, Value>, header: &str, value: Value) -> Result<(), String> {
    let (parents, leaf) = match header.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, header),
    };

    let mut current = root;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => return Err(format!("column '{header}' conflicts with column '{segment}'")),
        };
    }
    if current.contains_key(leaf) {
        return Err(format!("column '{header}' is defined more than once"));
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}
