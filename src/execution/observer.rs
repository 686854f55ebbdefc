use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        op: &'static str,
        /// Number of records (or edges) handed to the operation.
        inputs: usize,
    },
    RunFinished {
        op: &'static str,
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
    RunFailed {
        op: &'static str,
        elapsed: Duration,
        error: String,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Debug, Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { op, inputs } => eprintln!("[insight][start] op={op} inputs={inputs}"),
            ExecutionEvent::RunFinished { op, elapsed, metrics } => {
                eprintln!("[insight][ok] op={op} elapsed={elapsed:?} {metrics}")
            }
            ExecutionEvent::RunFailed { op, elapsed, error } => {
                eprintln!("[insight][fail] op={op} elapsed={elapsed:?} err={error}")
            }
        }
    }
}

/// Cumulative metrics across the runs of one engine.
///
/// The engine updates these counters as it evaluates; callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    runs_started: AtomicU64,
    runs_succeeded: AtomicU64,
    runs_failed: AtomicU64,
    inputs_processed: AtomicU64,
    last_elapsed_ns: AtomicU64,
    total_elapsed_ns: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&self, inputs: usize) {
        self.runs_started.fetch_add(1, Ordering::SeqCst);
        self.inputs_processed.fetch_add(inputs as u64, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration, succeeded: bool) {
        let ns = elapsed.as_nanos().min(u64::MAX as u128) as u64;
        self.last_elapsed_ns.store(ns, Ordering::SeqCst);
        self.total_elapsed_ns.fetch_add(ns, Ordering::SeqCst);
        let outcome = if succeeded { &self.runs_succeeded } else { &self.runs_failed };
        outcome.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let runs_started = self.runs_started.load(Ordering::SeqCst);
        let last_elapsed = (runs_started > 0)
            .then(|| Duration::from_nanos(self.last_elapsed_ns.load(Ordering::SeqCst)));

        ExecutionMetricsSnapshot {
            runs_started,
            runs_succeeded: self.runs_succeeded.load(Ordering::SeqCst),
            runs_failed: self.runs_failed.load(Ordering::SeqCst),
            inputs_processed: self.inputs_processed.load(Ordering::SeqCst),
            last_elapsed,
            total_elapsed: Duration::from_nanos(self.total_elapsed_ns.load(Ordering::SeqCst)),
        }
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub runs_started: u64,
    pub runs_succeeded: u64,
    pub runs_failed: u64,
    pub inputs_processed: u64,
    /// `None` until the first run.
    pub last_elapsed: Option<Duration>,
    pub total_elapsed: Duration,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={} ok={} failed={} inputs={} last_elapsed={:?} total_elapsed={:?}",
            self.runs_started,
            self.runs_succeeded,
            self.runs_failed,
            self.inputs_processed,
            self.last_elapsed,
            self.total_elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_outcomes() {
        let metrics = ExecutionMetrics::new();
        assert_eq!(metrics.snapshot().last_elapsed, None);

        metrics.begin_run(3);
        metrics.end_run(Duration::from_millis(2), true);
        metrics.begin_run(5);
        metrics.end_run(Duration::from_millis(1), false);

        let snap = metrics.snapshot();
        assert_eq!(snap.runs_started, 2);
        assert_eq!(snap.runs_succeeded, 1);
        assert_eq!(snap.runs_failed, 1);
        assert_eq!(snap.inputs_processed, 8);
        assert_eq!(snap.last_elapsed, Some(Duration::from_millis(1)));
        assert_eq!(snap.total_elapsed, Duration::from_millis(3));
        assert!(snap.to_string().starts_with("runs=2 ok=1 failed=1 inputs=8"));
    }
}
