//! Grouping by composite keys.

use std::collections::HashMap;

use crate::error::InsightsResult;
use crate::types::AsRecord;

use super::extract::{CompositeKey, composite_key};

/// Partitions `records` by their values at `paths`.
///
/// Groups appear in the order their first member appears in the input, and each group keeps the
/// input order of its members. Missing values form their own key part, so records without a
/// value are grouped together rather than dropped. Without paths the result is a single group
/// holding every record.
///
/// Values are compared by their textual form, lowercased unless `case_sensitive`.
pub fn group<'a, R: AsRecord, P: AsRef<str>>(
    records: &'a [R],
    paths: &[P],
    case_sensitive: bool,
) -> InsightsResult<Vec<Vec<&'a R>>> {
    if paths.is_empty() {
        return Ok(vec![records.iter().collect()]);
    }

    let mut groups: Vec<Vec<&'a R>> = Vec::new();
    let mut index: HashMap<CompositeKey, usize> = HashMap::with_capacity(records.len());

    for item in records {
        let key = composite_key(item, paths, case_sensitive)?;
        let i = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[i].push(item);
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::group;
    use crate::types::Record;
    use serde_json::json;

    fn records() -> Vec<Record> {
        [
            ("r1", json!("a"), true),
            ("r2", json!(null), true),
            ("r3", json!("b"), true),
            ("r4", json!("A"), true),
            ("r5", json!(1), true),
            ("r6", json!(["a", "b"]), true),
            ("r7", json!(["A", "b"]), true),
            ("r8", json!("a"), false),
        ]
        .into_iter()
        .map(|(id, value, value2)| {
            Record::from_value(id, json!({"value": value, "value2": value2}))
        })
        .collect()
    }

    fn ids(groups: Vec<Vec<&Record>>) -> Vec<Vec<&str>> {
        groups
            .into_iter()
            .map(|g| g.into_iter().map(|r| r.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn empty_records_yield_no_groups() {
        let empty: Vec<Record> = Vec::new();
        assert!(group(&empty, &["value"], false).unwrap().is_empty());
    }

    #[test]
    fn empty_paths_yield_one_group() {
        let rs = records();
        let groups = group(&rs, &[] as &[&str], false).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), rs.len());
    }

    #[test]
    fn groups_in_first_seen_order() {
        let rs = records();
        assert_eq!(
            ids(group(&rs, &["value"], false).unwrap()),
            vec![
                vec!["r1", "r4", "r8"],
                vec!["r2"],
                vec!["r3"],
                vec!["r5"],
                vec!["r6", "r7"],
            ]
        );
    }

    #[test]
    fn case_sensitive_grouping() {
        let rs = records();
        assert_eq!(
            ids(group(&rs, &["value"], true).unwrap()),
            vec![
                vec!["r1", "r8"],
                vec!["r2"],
                vec!["r3"],
                vec!["r4"],
                vec!["r5"],
                vec!["r6"],
                vec!["r7"],
            ]
        );
    }

    #[test]
    fn multiple_paths() {
        let rs = records();
        assert_eq!(
            ids(group(&rs, &["value", "value2"], false).unwrap()),
            vec![
                vec!["r1", "r4"],
                vec!["r2"],
                vec!["r3"],
                vec!["r5"],
                vec!["r6", "r7"],
                vec!["r8"],
            ]
        );
    }

    #[test]
    fn regrouping_restores_the_input() {
        let rs = records();
        let mut flattened: Vec<&str> = group(&rs, &["value"], false)
            .unwrap()
            .into_iter()
            .flatten()
            .map(|r| r.id.as_str())
            .collect();
        flattened.sort_unstable();
        assert_eq!(flattened, ["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
    }
}
