use record_insights::ingestion::json::records_from_path;
use record_insights::record::{
    average, count, count_distinct, filter, first, flatten, flatten_distinct, frequency_distribution, group,
    last, limit, max, median, min, newest, oldest, sort, standard_deviation, sum, values, values_distinct,
    FilterCondition, SortCriteria,
};
use record_insights::types::Record;
use record_insights::InsightsError;
use serde_json::json;

fn customers() -> Vec<Record> {
    records_from_path("tests/fixtures/records.json").unwrap()
}

fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
    records.into_iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn reductions_over_mixed_numeric_representations() {
    let rs = customers();

    assert_eq!(count(&rs), 4);
    assert_eq!(sum(&rs, "age").unwrap(), Some(109.0));
    assert_eq!(median(&rs, "age").unwrap(), Some(36.0));
    assert_eq!(min(&rs, "age").unwrap(), Some(28.0));
    assert_eq!(max(&rs, "age").unwrap(), Some(45.0));

    let mean = average(&rs, "age").unwrap().unwrap();
    assert!((mean - 109.0 / 3.0).abs() < 1e-9);

    let expected = ([36.0, 45.0, 28.0].iter().map(|n: &f64| (n - mean).powi(2)).sum::<f64>() / 3.0).sqrt();
    let sd = standard_deviation(&rs, "age").unwrap().unwrap();
    assert!((sd - expected).abs() < 1e-9);

    // Wildcards reach into every order of every customer.
    assert_eq!(sum(&rs, "orders.*.total").unwrap(), Some(225.5));
    assert_eq!(sum(&rs, "orders.1.total").unwrap(), Some(30.0));
    assert_eq!(sum(&rs, "nowhere").unwrap(), None);
}

#[test]
fn non_numeric_values_abort_reductions() {
    let rs = customers();
    let err = sum(&rs, "name").unwrap_err();
    assert!(matches!(err, InsightsError::UnparsableNumber { .. }));

    let err = sum(&rs, "tags").unwrap_err();
    assert!(matches!(err, InsightsError::TypeMismatch { .. }));
}

#[test]
fn distinct_counts_and_frequencies() {
    let rs = customers();

    assert_eq!(count_distinct(&rs, &["city"], false).unwrap(), 3);
    assert_eq!(count_distinct(&rs, &["city"], true).unwrap(), 4);
    assert_eq!(count_distinct(&rs, &["city", "name"], false).unwrap(), 4);

    let table = frequency_distribution(&rs, "city", false, None, false).unwrap();
    let rows: Vec<_> = table.iter().map(|e| (e.value.clone(), e.frequency)).collect();
    assert_eq!(rows, [(json!("Oslo"), 2), (json!("Rome"), 1), (json!("Berlin"), 1)]);
    assert_eq!(table[0].percentage, 0.5);

    let top = frequency_distribution(&rs, "city", false, Some(1), false).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].value, json!("Oslo"));

    let ascending = frequency_distribution(&rs, "city", false, None, true).unwrap();
    assert_eq!(ascending.last().map(|e| e.frequency), Some(2));
}

#[test]
fn flatten_and_values() {
    let rs = customers();

    assert_eq!(flatten(&rs, "tags").unwrap(), [json!("vip"), json!("beta"), json!("beta"), json!("VIP")]);
    assert_eq!(flatten_distinct(&rs, "tags", false).unwrap(), [json!("vip"), json!("beta")]);
    assert_eq!(flatten_distinct(&rs, "tags", true).unwrap().len(), 3);
    assert!(matches!(flatten(&rs, "name"), Err(InsightsError::TypeMismatch { .. })));

    assert_eq!(values(&rs, "age"), [json!(36), json!("45"), json!(28)]);
    assert_eq!(values_distinct(&rs, "city", false).unwrap(), [json!("Oslo"), json!("Rome"), json!("Berlin")]);
}

#[test]
fn selection_by_position_and_time() {
    let rs = customers();

    assert_eq!(first(&rs).map(|r| r.id.as_str()), Some("c1"));
    assert_eq!(last(&rs).map(|r| r.id.as_str()), Some("c4"));
    assert_eq!(newest(&rs, "signup").unwrap().map(|r| r.id.as_str()), Some("c3"));
    assert_eq!(oldest(&rs, "signup").unwrap().map(|r| r.id.as_str()), Some("c2"));
    assert!(matches!(newest(&rs, "name"), Err(InsightsError::UnparsableTime { .. })));

    assert_eq!(ids(limit(&rs, 2, 1)), ["c2", "c3"]);
    assert!(limit(&rs, -1, 0).is_empty());
}

#[test]
fn filter_then_sort_then_group() {
    let rs = customers();

    let oslo_over_40 = filter(
        &rs,
        &[
            FilterCondition::new("city").equals("OSLO"),
            FilterCondition::new("age").greater_than(40.0),
        ],
    )
    .unwrap();
    assert_eq!(ids(oslo_over_40), ["c2"]);

    let not_a = filter(&rs, &[FilterCondition::new("name").like_regex("^a").inverted()]).unwrap();
    assert_eq!(ids(not_a), ["c2", "c4"]);

    let missing_age = filter(&rs, &[FilterCondition::new("age").is_null(true)]).unwrap();
    assert_eq!(ids(missing_age), ["c3"]);

    let by_age = sort(&rs, &[SortCriteria::asc("age")]).unwrap();
    assert_eq!(ids(by_age), ["c4", "c1", "c2", "c3"]);

    let by_city = group(&rs, &["city"], false).unwrap();
    let grouped: Vec<Vec<&str>> = by_city.into_iter().map(ids).collect();
    assert_eq!(grouped, [vec!["c1", "c2"], vec!["c3"], vec!["c4"]]);
}

#[test]
fn null_records_are_tolerated() {
    let rs: Vec<Option<Record>> = customers().into_iter().map(Some).chain([None]).collect();

    assert_eq!(count(&rs), 5);
    assert_eq!(sum(&rs, "age").unwrap(), Some(109.0));
    assert!(last(&rs).is_none());
    assert_eq!(group(&rs, &["city"], false).unwrap().len(), 4);
}
