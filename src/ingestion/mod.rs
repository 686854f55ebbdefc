//! Loading records and relations from files.
//!
//! Most callers should use [`ingest_records_from_path`] / [`ingest_relations_from_path`] (from
//! [`unified`]) which:
//!
//! - auto-detect format by file extension (or you can override via [`IngestionOptions`])
//! - read into in-memory [`crate::types::Record`]s or [`crate::types::Relations`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    IngestionTarget, StdErrObserver,
};
pub use unified::{ingest_records_from_path, ingest_relations_from_path, IngestionFormat, IngestionOptions};
