use std::num::ParseFloatError;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type InsightsResult<T> = Result<T, InsightsError>;

/// Error type returned by extraction, aggregation, evaluation and ingestion functions.
///
/// A single enum is shared by every layer. The first error raised during a traversal aborts
/// the whole call; no partial results are returned.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// A path resolved to a non-null value of the wrong type for the requested extractor.
    #[error("invalid type while extracting {expected} from path '{path}', received {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A string value at a numeric path could not be parsed as a floating point number.
    #[error("failed to parse number from path '{path}' (raw='{raw}'): {source}")]
    UnparsableNumber {
        path: String,
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    /// A string value matched none of the supported timestamp formats.
    #[error("failed to parse time (raw='{raw}'): expected RFC 3339 or YYYY-MM-DDTHH:MM:SS[.ffffff]")]
    UnparsableTime { raw: String },

    /// A regex-like filter criterion failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An edge string did not consist of `recordA:recordB:ruleID`.
    #[error("malformed edge '{edge}': expected 'recordA:recordB:ruleID'")]
    MalformedEdge { edge: String },

    /// JSON (de)serialisation failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Ingested input does not have the expected shape (missing id column, non-object row, ...).
    #[error("input mismatch: {message}")]
    InputMismatch { message: String },
}
