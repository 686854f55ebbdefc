//! Request dispatch for host integrations.
//!
//! This module sits "above" [`crate::record`] and [`crate::edge`] and provides:
//!
//! - Typed, serde-deserialisable requests ([`Insight`], [`EdgeInsight`])
//! - A single entry point ([`InsightEngine::evaluate`]) per request family
//! - Run metrics + observer hooks for monitoring

mod insight;
mod observer;

use std::sync::Arc;
use std::time::Instant;

use crate::edge;
use crate::error::InsightsResult;
use crate::record;
use crate::types::{AsRecord, Relations};

pub use insight::{EdgeInsight, EdgeInsightValue, Insight, InsightValue};
pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use insight::top_limit;

/// Evaluates [`Insight`]s over records and [`EdgeInsight`]s over relations.
///
/// Evaluation is synchronous and never mutates the input. Every call is one run: it is counted
/// in [`InsightEngine::metrics`] and reported to the observer, if any.
///
/// ```rust
/// use record_insights::execution::{Insight, InsightEngine, InsightValue};
/// use record_insights::types::Record;
/// use serde_json::json;
///
/// let records = vec![
///     Record::from_value("r1", json!({"score": 4})),
///     Record::from_value("r2", json!({"score": "6"})),
/// ];
/// let insight: Insight = serde_json::from_value(json!({"op": "average", "path": "score"})).unwrap();
///
/// let engine = InsightEngine::new();
/// assert_eq!(engine.evaluate(&records, &insight).unwrap(), InsightValue::Number(Some(5.0)));
/// assert_eq!(engine.metrics().snapshot().runs_succeeded, 1);
/// ```
#[derive(Default)]
pub struct InsightEngine {
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl InsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to the run metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Evaluate a record insight. Record results borrow from `records`.
    pub fn evaluate<'a, R: AsRecord>(
        &self,
        records: &'a [R],
        insight: &Insight,
    ) -> InsightsResult<InsightValue<'a, R>> {
        self.run(insight.name(), records.len(), || dispatch(records, insight))
    }

    /// Evaluate an edge insight.
    pub fn evaluate_edges(
        &self,
        relations: &Relations,
        insight: &EdgeInsight,
    ) -> InsightsResult<EdgeInsightValue> {
        let edges = &relations.edges;
        self.run(insight.name(), edges.len(), || match insight {
            EdgeInsight::Count => Ok(EdgeInsightValue::Count(edge::count(edges))),
            EdgeInsight::FrequencyDistribution { top, ascending } => {
                edge::frequency_distribution(edges, top_limit(*top), *ascending)
                    .map(EdgeInsightValue::Frequencies)
            }
            EdgeInsight::Matrix { links } => {
                edge::matrix(edges, &relations.duplicates, links.as_deref()).map(EdgeInsightValue::Matrix)
            }
        })
    }

    /// Evaluate a JSON-encoded [`Insight`] and return the JSON-encoded result.
    pub fn evaluate_json<R: AsRecord>(
        &self,
        records: &[R],
        request: &str,
    ) -> InsightsResult<serde_json::Value> {
        let insight: Insight = serde_json::from_str(request)?;
        let value = self.evaluate(records, &insight)?;
        Ok(serde_json::to_value(&value)?)
    }

    fn run<T>(&self, op: &'static str, inputs: usize, f: impl FnOnce() -> InsightsResult<T>) -> InsightsResult<T> {
        let start = Instant::now();
        self.metrics.begin_run(inputs);
        self.emit(ExecutionEvent::RunStarted { op, inputs });

        let out = f();

        let elapsed = start.elapsed();
        self.metrics.end_run(elapsed, out.is_ok());
        match &out {
            Ok(_) => self.emit(ExecutionEvent::RunFinished {
                op,
                elapsed,
                metrics: self.metrics.snapshot(),
            }),
            Err(e) => self.emit(ExecutionEvent::RunFailed {
                op,
                elapsed,
                error: e.to_string(),
            }),
        }
        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn dispatch<'a, R: AsRecord>(records: &'a [R], insight: &Insight) -> InsightsResult<InsightValue<'a, R>> {
    use self::InsightValue as V;

    Ok(match insight {
        Insight::Count => V::Count(record::count(records)),
        Insight::CountDistinct { paths, case_sensitive } => {
            V::Count(record::count_distinct(records, paths, *case_sensitive)?)
        }
        Insight::Sum { path } => V::Number(record::sum(records, path)?),
        Insight::Average { path } => V::Number(record::average(records, path)?),
        Insight::Median { path } => V::Number(record::median(records, path)?),
        Insight::Min { path } => V::Number(record::min(records, path)?),
        Insight::Max { path } => V::Number(record::max(records, path)?),
        Insight::StandardDeviation { path } => V::Number(record::standard_deviation(records, path)?),
        Insight::Confidence { path, case_sensitive } => {
            V::Number(record::confidence(records, path, *case_sensitive)?)
        }
        Insight::FrequencyDistribution {
            path,
            case_sensitive,
            top,
            ascending,
        } => V::Frequencies(record::frequency_distribution(
            records,
            path,
            *case_sensitive,
            top_limit(*top),
            *ascending,
        )?),
        Insight::Flatten { path } => V::Values(record::flatten(records, path)?),
        Insight::FlattenDistinct { path, case_sensitive } => {
            V::Values(record::flatten_distinct(records, path, *case_sensitive)?)
        }
        Insight::Values { path } => V::Values(record::values(records, path)),
        Insight::ValuesDistinct { path, case_sensitive } => {
            V::Values(record::values_distinct(records, path, *case_sensitive)?)
        }
        Insight::First => V::Record(record::first(records)),
        Insight::Last => V::Record(record::last(records)),
        Insight::Newest { path } => V::Record(record::newest(records, path)?),
        Insight::Oldest { path } => V::Record(record::oldest(records, path)?),
        Insight::Limit { count, offset } => V::Records(record::limit(records, *count, *offset)),
        Insight::Filter { conditions } => V::Records(record::filter(records, conditions)?),
        Insight::Sort { criteria } => V::Records(record::sort(records, criteria)?),
        Insight::Group { paths, case_sensitive } => V::Groups(record::group(records, paths, *case_sensitive)?),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::InsightsError;
    use crate::types::Record;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl ExecutionObserver for Recorder {
        fn on_event(&self, event: &ExecutionEvent) {
            let line = match event {
                ExecutionEvent::RunStarted { op, inputs } => format!("start {op} {inputs}"),
                ExecutionEvent::RunFinished { op, .. } => format!("ok {op}"),
                ExecutionEvent::RunFailed { op, .. } => format!("fail {op}"),
            };
            if let Ok(mut lines) = self.0.lock() {
                lines.push(line);
            }
        }
    }

    fn records() -> Vec<Option<Record>> {
        vec![
            Some(Record::from_value("r1", json!({"city": "Oslo", "n": 1}))),
            None,
            Some(Record::from_value("r2", json!({"city": "oslo", "n": 2}))),
            Some(Record::from_value("r3", json!({"city": "Rome", "n": "x"}))),
        ]
    }

    #[test]
    fn dispatches_record_insights() {
        let rs = records();
        let engine = InsightEngine::new();

        assert_eq!(engine.evaluate(&rs, &Insight::Count).unwrap(), InsightValue::Count(4));

        let distinct = Insight::CountDistinct {
            paths: vec!["city".to_string()],
            case_sensitive: false,
        };
        assert_eq!(engine.evaluate(&rs, &distinct).unwrap(), InsightValue::Count(2));

        let first = engine.evaluate(&rs, &Insight::First).unwrap();
        assert!(matches!(first, InsightValue::Record(Some(r)) if r.id == "r1"));

        let group = Insight::Group {
            paths: vec!["city".to_string()],
            case_sensitive: false,
        };
        match engine.evaluate(&rs, &group).unwrap() {
            InsightValue::Groups(groups) => assert_eq!(groups.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failures_are_counted_and_reported() {
        let rs = records();
        let recorder = Arc::new(Recorder::default());
        let engine = InsightEngine::new().with_observer(recorder.clone());

        let err = engine
            .evaluate(&rs, &Insight::Sum { path: "n".to_string() })
            .unwrap_err();
        assert!(matches!(err, InsightsError::UnparsableNumber { .. }));
        engine.evaluate(&rs, &Insight::Last).unwrap();

        let snap = engine.metrics().snapshot();
        assert_eq!(snap.runs_started, 2);
        assert_eq!(snap.runs_failed, 1);
        assert_eq!(snap.runs_succeeded, 1);
        assert_eq!(snap.inputs_processed, 8);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            ["start sum 4", "fail sum", "start last 4", "ok last"]
        );
    }

    #[test]
    fn dispatches_edge_insights() {
        let relations = Relations {
            edges: vec!["b:a:R1".to_string(), "a:c:R2".to_string(), "c:d:R1".to_string()],
            duplicates: [("a".to_string(), vec!["d".to_string()])].into_iter().collect(),
        };
        let engine = InsightEngine::new();

        assert_eq!(
            engine.evaluate_edges(&relations, &EdgeInsight::Count).unwrap(),
            EdgeInsightValue::Count(3)
        );

        let top = EdgeInsight::FrequencyDistribution { top: 1, ascending: false };
        match engine.evaluate_edges(&relations, &top).unwrap() {
            EdgeInsightValue::Frequencies(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].rule_id, "R1");
                assert_eq!(rows[0].frequency, 2);
            }
            other => panic!("unexpected {other:?}"),
        }

        let matrix = EdgeInsight::Matrix { links: None };
        match engine.evaluate_edges(&relations, &matrix).unwrap() {
            EdgeInsightValue::Matrix(rows) => assert_eq!(rows.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn evaluates_json_requests() {
        let rs = records();
        let engine = InsightEngine::new();

        let out = engine
            .evaluate_json(&rs, r#"{"op": "frequencyDistribution", "path": "city", "top": 1}"#)
            .unwrap();
        assert_eq!(out, json!([{"value": "Oslo", "frequency": 2, "percentage": 2.0 / 3.0}]));

        let out = engine
            .evaluate_json(&rs, r#"{"op": "limit", "count": 2, "offset": 1}"#)
            .unwrap();
        assert_eq!(out, json!([null, {"id": "r2", "data": {"city": "oslo", "n": 2}}]));

        assert!(matches!(
            engine.evaluate_json(&rs, r#"{"op": "nope"}"#),
            Err(InsightsError::Json(_))
        ));
    }
}
