//! Multi-criteria record filtering.
//!
//! A record is kept when every [`FilterCondition`] holds. Within one condition the criteria are
//! checked in a fixed order (null check, string, numeric, time) and all of them must hold;
//! `invert` negates the combined result of that one condition.

use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde::Deserialize;

use crate::error::{InsightsError, InsightsResult};
use crate::types::{AsRecord, Timestamp, Value};

use super::extract::{extract, extract_number, extract_string, extract_time, value_to_string};

/// Criteria applied to the value at one path.
///
/// Unset criteria always hold. A set criterion (other than `is_null`) never holds for a
/// missing value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCondition {
    pub path: String,

    /// Equality. Numeric if the record value parses as a number, textual otherwise.
    pub equals: Option<Value>,
    /// `true` requires a missing value, `false` a present one.
    pub is_null: Option<bool>,

    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub like_regex: Option<String>,

    pub less_than: Option<f64>,
    pub less_equals: Option<f64>,
    pub greater_than: Option<f64>,
    pub greater_equals: Option<f64>,

    pub after: Option<Timestamp>,
    pub since: Option<Timestamp>,
    pub before: Option<Timestamp>,
    pub until: Option<Timestamp>,

    pub invert: bool,
    pub case_sensitive: bool,
}

impl FilterCondition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn equals(mut self, value: impl Into<Value>) -> Self {
        self.equals = Some(value.into());
        self
    }

    pub fn is_null(mut self, is_null: bool) -> Self {
        self.is_null = Some(is_null);
        self
    }

    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.ends_with = Some(suffix.into());
        self
    }

    pub fn like_regex(mut self, pattern: impl Into<String>) -> Self {
        self.like_regex = Some(pattern.into());
        self
    }

    pub fn less_than(mut self, bound: f64) -> Self {
        self.less_than = Some(bound);
        self
    }

    pub fn less_equals(mut self, bound: f64) -> Self {
        self.less_equals = Some(bound);
        self
    }

    pub fn greater_than(mut self, bound: f64) -> Self {
        self.greater_than = Some(bound);
        self
    }

    pub fn greater_equals(mut self, bound: f64) -> Self {
        self.greater_equals = Some(bound);
        self
    }

    pub fn after(mut self, bound: DateTime<impl TimeZone>) -> Self {
        self.after = Some(bound.fixed_offset());
        self
    }

    pub fn since(mut self, bound: DateTime<impl TimeZone>) -> Self {
        self.since = Some(bound.fixed_offset());
        self
    }

    pub fn before(mut self, bound: DateTime<impl TimeZone>) -> Self {
        self.before = Some(bound.fixed_offset());
        self
    }

    pub fn until(mut self, bound: DateTime<impl TimeZone>) -> Self {
        self.until = Some(bound.fixed_offset());
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    fn equals_value(&self) -> Option<&Value> {
        self.equals.as_ref().filter(|v| !v.is_null())
    }

    fn has_string_criteria(&self) -> bool {
        self.equals_value().is_some()
            || self.starts_with.is_some()
            || self.ends_with.is_some()
            || self.like_regex.is_some()
    }

    fn has_numeric_criteria(&self) -> bool {
        self.less_than.is_some()
            || self.less_equals.is_some()
            || self.greater_than.is_some()
            || self.greater_equals.is_some()
    }

    fn has_time_criteria(&self) -> bool {
        self.after.is_some() || self.since.is_some() || self.before.is_some() || self.until.is_some()
    }
}

/// Returns the records for which every condition holds, in input order.
///
/// Without conditions every record is returned. The first extraction error, or an invalid
/// `like_regex` pattern that is applied to a value, aborts the call.
pub fn filter<'a, R: AsRecord>(
    records: &'a [R],
    conditions: &[FilterCondition],
) -> InsightsResult<Vec<&'a R>> {
    let prepared: Vec<Prepared<'_>> = conditions.iter().map(Prepared::new).collect();

    let mut kept = Vec::with_capacity(records.len());
    'records: for item in records {
        for condition in &prepared {
            if condition.holds(item)? == condition.condition.invert {
                continue 'records;
            }
        }
        kept.push(item);
    }
    Ok(kept)
}

/// A condition with its pattern compiled once per call.
struct Prepared<'c> {
    condition: &'c FilterCondition,
    // A compile error surfaces only once the pattern is applied to a value.
    regex: Option<Result<Regex, regex::Error>>,
}

impl<'c> Prepared<'c> {
    fn new(condition: &'c FilterCondition) -> Self {
        let regex = condition.like_regex.as_deref().map(|pattern| {
            if condition.case_sensitive {
                Regex::new(pattern)
            } else {
                Regex::new(&format!("(?i){pattern}"))
            }
        });
        Self { condition, regex }
    }

    fn holds<R: AsRecord + ?Sized>(&self, record: &R) -> InsightsResult<bool> {
        let c = self.condition;
        if let Some(is_null) = c.is_null {
            if extract(record, &c.path).is_none() != is_null {
                return Ok(false);
            }
        }
        Ok(self.string_criteria_hold(record)?
            && numeric_criteria_hold(record, c)?
            && time_criteria_hold(record, c)?)
    }

    fn string_criteria_hold<R: AsRecord + ?Sized>(&self, record: &R) -> InsightsResult<bool> {
        let c = self.condition;
        if !c.has_string_criteria() {
            return Ok(true);
        }
        let Some(value) = extract_string(record, &c.path, c.case_sensitive)? else {
            return Ok(false);
        };

        if let Some(expected) = c.equals_value() {
            if !equals(&value, expected, c.case_sensitive)? {
                return Ok(false);
            }
        }
        if let Some(prefix) = &c.starts_with {
            if !value.starts_with(normalize(prefix, c.case_sensitive).as_str()) {
                return Ok(false);
            }
        }
        if let Some(suffix) = &c.ends_with {
            if !value.ends_with(normalize(suffix, c.case_sensitive).as_str()) {
                return Ok(false);
            }
        }
        if let Some(regex) = &self.regex {
            let regex = regex.as_ref().map_err(|err| InsightsError::InvalidPattern(err.clone()))?;
            if !regex.is_match(&value) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Numeric comparison when the record value is numeric, textual comparison otherwise.
///
/// A numeric record value never equals a non-numeric expectation.
fn equals(value: &str, expected: &Value, case_sensitive: bool) -> InsightsResult<bool> {
    let expected = value_to_string(expected, case_sensitive)?;
    match value.parse::<f64>() {
        Ok(actual) => Ok(expected.parse::<f64>().is_ok_and(|expected| actual == expected)),
        Err(_) => Ok(value == expected),
    }
}

fn normalize(criterion: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        criterion.to_string()
    } else {
        criterion.to_lowercase()
    }
}

fn numeric_criteria_hold<R: AsRecord + ?Sized>(
    record: &R,
    c: &FilterCondition,
) -> InsightsResult<bool> {
    if !c.has_numeric_criteria() {
        return Ok(true);
    }
    let value = extract_number(record, &c.path)?;
    Ok(compare(value, c.less_than, |a, b| a < b)
        && compare(value, c.less_equals, |a, b| a <= b)
        && compare(value, c.greater_than, |a, b| a > b)
        && compare(value, c.greater_equals, |a, b| a >= b))
}

fn time_criteria_hold<R: AsRecord + ?Sized>(record: &R, c: &FilterCondition) -> InsightsResult<bool> {
    if !c.has_time_criteria() {
        return Ok(true);
    }
    let value = extract_time(record, &c.path)?;
    Ok(compare(value, c.after, |a, b| a > b)
        && compare(value, c.since, |a, b| a >= b)
        && compare(value, c.before, |a, b| a < b)
        && compare(value, c.until, |a, b| a <= b))
}

fn compare<T>(value: Option<T>, bound: Option<T>, op: impl Fn(&T, &T) -> bool) -> bool {
    match (value, bound) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(value), Some(bound)) => op(&value, &bound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use chrono::Utc;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::from_value(
                "r1",
                json!({
                    "value": "string A",
                    "map": {"foo": "bar", "faz": "BAZ"},
                    "numeric": 12.3,
                    "time": "2022-01-01T00:00:00Z"
                }),
            ),
            Record::from_value(
                "r2",
                json!({"value": "string B", "numeric": "123", "time": "2023-01-01T00:00:00Z"}),
            ),
            Record::from_value(
                "r3",
                json!({"value": "other string A", "numeric": 1234.0, "time": "2024-01-01T00:00:00Z"}),
            ),
        ]
    }

    fn run(records: &[Record], conditions: &[FilterCondition]) -> Vec<String> {
        filter(records, conditions)
            .unwrap()
            .into_iter()
            .map(|r| r.id.clone())
            .collect()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn without_conditions_or_criteria_everything_is_kept() {
        let rs = records();
        assert_eq!(run(&rs, &[]), ["r1", "r2", "r3"]);
        assert_eq!(run(&rs, &[FilterCondition::new("value")]), ["r1", "r2", "r3"]);
    }

    #[test]
    fn equals_compares_normalized_strings() {
        let rs = records();
        assert_eq!(run(&rs, &[FilterCondition::new("value").equals("string a")]), ["r1"]);
        assert_eq!(
            run(&rs, &[FilterCondition::new("value").equals("string A").case_sensitive()]),
            ["r1"]
        );
        assert!(run(&rs, &[FilterCondition::new("value").equals("string a").case_sensitive()]).is_empty());
        assert!(run(&rs, &[FilterCondition::new("nope").equals("string a")]).is_empty());
        assert_eq!(
            run(&rs, &[FilterCondition::new("value").equals("string a").inverted()]),
            ["r2", "r3"]
        );
    }

    #[test]
    fn equals_prefers_numeric_comparison() {
        let rs = vec![Record::from_value("r4", json!({"numeric": 1.234567e+06, "text": "1e3"}))];
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").equals(1234567)]), ["r4"]);
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").equals("1.234567e+06")]), ["r4"]);
        assert_eq!(run(&rs, &[FilterCondition::new("text").equals(1000)]), ["r4"]);
        assert!(run(&rs, &[FilterCondition::new("numeric").equals("abc")]).is_empty());
    }

    #[test]
    fn equals_compares_objects_by_canonical_json() {
        let rs = records();
        let expected = json!({"faz": "baz", "foo": "bar"});
        assert_eq!(run(&rs, &[FilterCondition::new("map").equals(expected.clone())]), ["r1"]);
        assert!(run(&rs, &[FilterCondition::new("map").equals(expected).case_sensitive()]).is_empty());
    }

    #[test]
    fn null_equals_is_unset() {
        let rs = records();
        let mut condition = FilterCondition::new("nope");
        condition.equals = Some(Value::Null);
        assert_eq!(run(&rs, &[condition]), ["r1", "r2", "r3"]);
    }

    #[test]
    fn is_null_checks_presence() {
        let rs = records();
        assert_eq!(run(&rs, &[FilterCondition::new("nope").is_null(true)]), ["r1", "r2", "r3"]);
        assert_eq!(run(&rs, &[FilterCondition::new("map").is_null(true)]), ["r2", "r3"]);
        assert!(run(&rs, &[FilterCondition::new("nope").is_null(false)]).is_empty());
        assert_eq!(run(&rs, &[FilterCondition::new("map").is_null(false)]), ["r1"]);
    }

    #[test]
    fn prefix_and_suffix() {
        let rs = records();
        assert_eq!(run(&rs, &[FilterCondition::new("value").starts_with("STRING")]), ["r1", "r2"]);
        assert!(run(&rs, &[FilterCondition::new("value").starts_with("STRING").case_sensitive()]).is_empty());
        assert_eq!(run(&rs, &[FilterCondition::new("value").ends_with("string a")]), ["r1", "r3"]);
        assert_eq!(
            run(&rs, &[FilterCondition::new("value").ends_with("string A").case_sensitive()]),
            ["r1", "r3"]
        );
        assert!(run(&rs, &[FilterCondition::new("nope").ends_with("a")]).is_empty());
    }

    #[test]
    fn like_regex() {
        let rs = records();
        assert_eq!(run(&rs, &[FilterCondition::new("value").like_regex(r"String\s+a$")]), ["r1", "r3"]);
        assert!(run(&rs, &[FilterCondition::new("value").like_regex(r"string\s+a$").case_sensitive()]).is_empty());
        assert!(run(&rs, &[FilterCondition::new("nope").like_regex(r"string")]).is_empty());
    }

    #[test]
    fn invalid_regex_fails_once_applied() {
        let rs = records();
        let err = filter(&rs, &[FilterCondition::new("value").like_regex("foo(")]).unwrap_err();
        assert!(matches!(err, InsightsError::InvalidPattern(_)));

        // Never applied when no value is present.
        assert!(run(&rs, &[FilterCondition::new("nope").like_regex("foo(")]).is_empty());
    }

    #[test]
    fn numeric_comparisons() {
        let rs = records();
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").less_than(123.0)]), ["r1"]);
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").less_equals(123.0)]), ["r1", "r2"]);
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").greater_than(123.0)]), ["r3"]);
        assert_eq!(run(&rs, &[FilterCondition::new("numeric").greater_equals(123.0)]), ["r2", "r3"]);
        assert!(run(&rs, &[FilterCondition::new("nope").less_than(150.0)]).is_empty());
        assert!(filter(&rs, &[FilterCondition::new("value").less_than(150.0)]).is_err());
    }

    #[test]
    fn time_comparisons() {
        let rs = records();
        let bound = utc(2023, 1, 1);
        assert_eq!(run(&rs, &[FilterCondition::new("time").after(bound)]), ["r3"]);
        assert_eq!(run(&rs, &[FilterCondition::new("time").since(bound)]), ["r2", "r3"]);
        assert_eq!(run(&rs, &[FilterCondition::new("time").before(bound)]), ["r1"]);
        assert_eq!(run(&rs, &[FilterCondition::new("time").until(bound)]), ["r1", "r2"]);
        assert!(run(&rs, &[FilterCondition::new("nope").after(bound)]).is_empty());
        assert!(matches!(
            filter(&rs, &[FilterCondition::new("value").after(bound)]).unwrap_err(),
            InsightsError::UnparsableTime { .. }
        ));
    }

    #[test]
    fn conditions_are_combined_with_and() {
        let rs = records();
        let conditions = [
            FilterCondition::new("value").ends_with("a"),
            FilterCondition::new("numeric").greater_than(100.0),
        ];
        assert_eq!(run(&rs, &conditions), ["r3"]);
    }

    #[test]
    fn null_records_only_pass_null_checks() {
        let rs = vec![None, Some(records().remove(0))];
        let kept = filter(&rs, &[FilterCondition::new("value").is_null(true)]).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].is_none());
    }

    #[test]
    fn deserializes_from_camel_case() {
        let condition: FilterCondition = serde_json::from_value(json!({
            "path": "time",
            "since": "2023-01-01T00:00:00Z",
            "greaterEquals": 1,
            "caseSensitive": true
        }))
        .unwrap();
        assert_eq!(condition.since, Some(utc(2023, 1, 1).fixed_offset()));
        assert_eq!(condition.greater_equals, Some(1.0));
        assert!(condition.case_sensitive);
        assert!(!condition.invert);
    }
}
