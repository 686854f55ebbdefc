use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::InsightsError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    Warning,
    /// The input could not be ingested.
    Error,
    /// I/O failures: missing files, permissions, broken reads.
    Critical,
}

impl IngestionSeverity {
    /// Grades an ingestion failure.
    pub fn of(error: &InsightsError) -> Self {
        match error {
            InsightsError::Io(_) => Self::Critical,
            InsightsError::Csv(err) if matches!(err.kind(), ::csv::ErrorKind::Io(_)) => Self::Critical,
            _ => Self::Error,
        }
    }
}

/// What is being ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionTarget {
    Records,
    Relations,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: IngestionFormat,
    pub target: IngestionTarget,
}

impl fmt::Display for IngestionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target={:?} format={} path={}",
            self.target,
            self.format,
            self.path.display()
        )
    }
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Records read, or edges plus duplicate entries for relations.
    pub items: usize,
}

/// Observer interface for ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &InsightsError) {}

    /// Called when a failure meets the alert threshold. Forwards to [`Self::on_failure`] by default.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans out callbacks to several observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn IngestionObserver>) {
        self.observers.push(observer);
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[ingest][ok] {ctx} items={}", stats.items);
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        eprintln!("[ingest][{severity:?}] {ctx} err={error}");
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        eprintln!("[ALERT][ingest][{severity:?}] {ctx} err={error}");
    }
}

/// Appends ingestion events to a local log file.
///
/// Writes are best-effort; failures to open or write the log file are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, args: fmt::Arguments<'_>) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {args}", unix_ts());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(format_args!("ok {ctx} items={}", stats.items));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        self.append(format_args!("fail severity={severity:?} {ctx} err={error}"));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &InsightsError) {
        self.append(format_args!("ALERT severity={severity:?} {ctx} err={error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_critical() {
        let io = InsightsError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(IngestionSeverity::of(&io), IngestionSeverity::Critical);

        let mismatch = InsightsError::InputMismatch {
            message: "x".to_string(),
        };
        assert_eq!(IngestionSeverity::of(&mismatch), IngestionSeverity::Error);
        assert!(IngestionSeverity::Critical > IngestionSeverity::Error);
    }

    #[test]
    fn context_renders_for_logs() {
        let ctx = IngestionContext {
            path: PathBuf::from("records.csv"),
            format: IngestionFormat::Csv,
            target: IngestionTarget::Records,
        };
        assert_eq!(ctx.to_string(), "target=Records format=csv path=records.csv");
    }
}
