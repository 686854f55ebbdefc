//! Unified ingestion entrypoints.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{InsightsError, InsightsResult};
use crate::types::{Record, Relations};

use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, IngestionTarget,
};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// JSON array, single object or NDJSON.
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

/// Options controlling unified ingestion behavior.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// CSV column holding the record id.
    pub id_column: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("id_column", &self.id_column)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            id_column: "id".to_string(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Reads records from a JSON, NDJSON or CSV file.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with the number of records
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use record_insights::ingestion::{ingest_records_from_path, IngestionOptions, StdErrObserver};
///
/// # fn main() -> Result<(), record_insights::InsightsError> {
/// let opts = IngestionOptions {
///     id_column: "customer_id".to_string(),
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let records = ingest_records_from_path("customers.csv", &opts)?;
/// println!("records={}", records.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_records_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> InsightsResult<Vec<Record>> {
    let path = path.as_ref();
    observed(
        path,
        IngestionTarget::Records,
        options,
        |records: &Vec<Record>| records.len(),
        |format| match format {
            IngestionFormat::Json => json::records_from_path(path),
            IngestionFormat::Csv => csv::records_from_path(path, &options.id_column),
        },
    )
}

/// Reads edges and duplicates from a JSON file.
pub fn ingest_relations_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> InsightsResult<Relations> {
    let path = path.as_ref();
    observed(
        path,
        IngestionTarget::Relations,
        options,
        |r: &Relations| r.edges.len() + r.duplicates.len(),
        |format| match format {
            IngestionFormat::Json => json::relations_from_path(path),
            IngestionFormat::Csv => Err(InsightsError::InputMismatch {
                message: "relations can only be read from json".to_string(),
            }),
        },
    )
}

fn observed<T>(
    path: &Path,
    target: IngestionTarget,
    options: &IngestionOptions,
    items: impl Fn(&T) -> usize,
    ingest: impl FnOnce(IngestionFormat) -> InsightsResult<T>,
) -> InsightsResult<T> {
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    let result = ingest(format);

    if let Some(obs) = options.observer.as_ref() {
        let ctx = IngestionContext {
            path: path.to_path_buf(),
            format,
            target,
        };
        match &result {
            Ok(value) => obs.on_success(&ctx, IngestionStats { items: items(value) }),
            Err(e) => {
                let sev = IngestionSeverity::of(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn infer_format_from_path(path: &Path) -> InsightsResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| InsightsError::InputMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| InsightsError::InputMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_from_extensions() {
        assert_eq!(IngestionFormat::from_extension("JSON"), Some(IngestionFormat::Json));
        assert_eq!(IngestionFormat::from_extension("ndjson"), Some(IngestionFormat::Json));
        assert_eq!(IngestionFormat::from_extension("csv"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("parquet"), None);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let err = ingest_records_from_path("data.parquet", &IngestionOptions::default()).unwrap_err();
        assert!(matches!(err, InsightsError::InputMismatch { .. }));
        assert!(ingest_records_from_path("no_extension", &IngestionOptions::default()).is_err());
    }
}
