//! Picking single records or slices out of a record list.

use crate::error::InsightsResult;
use crate::types::{AsRecord, Record, Timestamp};

use super::visit::visit_time;

/// The first record of the list, or `None` if the list is empty or starts with a null record.
pub fn first<R: AsRecord>(records: &[R]) -> Option<&Record> {
    records.first().and_then(AsRecord::as_record)
}

/// The last record of the list, or `None` if the list is empty or ends with a null record.
pub fn last<R: AsRecord>(records: &[R]) -> Option<&Record> {
    records.last().and_then(AsRecord::as_record)
}

/// The record holding the most recent time at `path`.
///
/// On ties the first record wins. Returns `None` if no record has a time at `path`.
pub fn newest<'a, R: AsRecord>(records: &'a [R], path: &str) -> InsightsResult<Option<&'a Record>> {
    extreme(records, path, |candidate, current| candidate > current)
}

/// The record holding the earliest time at `path`.
///
/// On ties the first record wins. Returns `None` if no record has a time at `path`.
pub fn oldest<'a, R: AsRecord>(records: &'a [R], path: &str) -> InsightsResult<Option<&'a Record>> {
    extreme(records, path, |candidate, current| candidate < current)
}

fn extreme<'a, R: AsRecord>(
    records: &'a [R],
    path: &str,
    replaces: impl Fn(&Timestamp, &Timestamp) -> bool,
) -> InsightsResult<Option<&'a Record>> {
    let mut best: Option<(Timestamp, &'a Record)> = None;
    visit_time(records, path, |time, record| {
        let (Some(time), Some(record)) = (time, record) else {
            return Ok(());
        };
        if best.as_ref().is_none_or(|(current, _)| replaces(&time, current)) {
            best = Some((time, record));
        }
        Ok(())
    })?;
    Ok(best.map(|(_, record)| record))
}

/// Up to `count` records, skipping the first `offset` ones.
///
/// Returns an empty list when `count <= 0`, `offset < 0` or `offset` is beyond the list.
pub fn limit<R>(records: &[R], count: i64, offset: i64) -> Vec<&R> {
    let (Ok(count), Ok(offset)) = (usize::try_from(count), usize::try_from(offset)) else {
        return Vec::new();
    };
    records.iter().skip(offset).take(count).collect()
}
